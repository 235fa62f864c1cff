use pretty_assertions::assert_eq;

use super::*;

#[test]
fn primitive_descriptors() {
    let letters: String = PrimType::ALL.iter().map(|p| p.descriptor()).collect();
    assert_eq!(letters, "ZBSCIJFD");
}

#[test]
fn boxing_round_trips_through_wrapper_names() {
    for prim in PrimType::ALL {
        assert_eq!(PrimType::from_boxed(&prim.boxed_class()), Some(prim));
    }
    assert_eq!(PrimType::from_boxed(&FqName::new("java.lang.String")), None);
}

#[test]
fn array_descriptor_and_runtime_name() {
    let ty = Type::array(Type::string());
    assert_eq!(ty.descriptor(), "[Ljava/lang/String;");
    assert_eq!(ty.runtime_class_name(), "[Ljava.lang.String;");
    assert_eq!(Type::array(Type::INT).runtime_class_name(), "[I");
    assert_eq!(Type::INT.runtime_class_name(), "I");
    assert_eq!(Type::string().runtime_class_name(), "java.lang.String");
}

#[test]
fn generics_erase_to_base() {
    let ty = Type::Generic {
        base: FqName::new("java.util.List"),
        args: vec![Type::string()],
    };
    assert_eq!(ty.descriptor(), "Ljava/util/List;");
    assert_eq!(ty.class_name(), Some(&FqName::new("java.util.List")));
    assert_eq!(ty.to_string(), "java.util.List<java.lang.String>");
}

#[test]
fn method_descriptor() {
    let ty = MethodType::new(vec![Type::array(Type::string())], Type::Void);
    assert_eq!(ty.descriptor(), "([Ljava/lang/String;)V");
    assert!(ty.is_void());

    let ty = MethodType::new(vec![Type::INT, Type::LONG], Type::object());
    assert_eq!(ty.descriptor(), "(IJ)Ljava/lang/Object;");
}

#[test]
fn display_is_source_like() {
    assert_eq!(Type::array(Type::CHAR).to_string(), "char[]");
    assert_eq!(Type::Null.to_string(), "null");
    assert_eq!(Type::Void.to_string(), "void");
}
