use pretty_assertions::assert_eq;

use super::*;

fn void_method(name: &str) -> Method {
    Method::new(name, vec![], Type::Void, Modifiers::PUBLIC)
}

fn sample() -> Program {
    let marker = Annotation::new("app.Marker");
    let tagged = Annotation::new("app.Tagged").with_element(
        "inner",
        AnnotationValue::List(vec![AnnotationValue::Annotation(Annotation::new(
            "app.Marker",
        ))]),
    );
    Program::new("app.Main")
        .with_class(Class::new("java.lang.Object", ClassKind::Class).with_method(void_method("root")))
        .with_class(
            Class::new("app.Base", ClassKind::Abstract)
                .with_method(void_method("run"))
                .with_field(Field::new("count", Type::INT, Modifiers::STATIC)),
        )
        .with_class(
            Class::new("app.Main", ClassKind::Class)
                .with_super("app.Base")
                .with_annotation(marker.clone())
                .with_method(void_method("go").with_annotation(tagged))
                .with_field(Field::new("x", Type::INT, Modifiers::PUBLIC).with_annotation(marker)),
        )
}

#[test]
fn root_class_has_no_super() {
    let object = Class::new("java.lang.Object", ClassKind::Class);
    assert_eq!(object.extending, None);
    assert!(object.is_root());
    let other = Class::new("app.A", ClassKind::Class);
    assert_eq!(other.extending, Some(FqName::new("java.lang.Object")));
}

#[test]
fn method_lookup_walks_ancestors() {
    let program = sample();
    let (owner, method) = program
        .method(&FqName::new("app.Main"), "run", "()V")
        .expect("inherited");
    assert_eq!(owner.name.as_str(), "app.Base");
    assert_eq!(method.name, "run");

    let (owner, _) = program
        .method(&FqName::new("app.Main"), "root", "()V")
        .expect("from root");
    assert!(owner.is_root());

    assert!(program.method(&FqName::new("app.Main"), "run", "(I)V").is_none());
}

#[test]
fn field_lookup_walks_ancestors() {
    let program = sample();
    let (owner, field) = program
        .field(&FqName::new("app.Main"), "count")
        .expect("inherited field");
    assert_eq!(owner.name.as_str(), "app.Base");
    assert!(field.is_static());
}

#[test]
fn registry_collects_nested_annotations_once_per_type() {
    let program = sample();
    let registry = program.annotation_registry();
    assert_eq!(registry.instances.len(), 4);
    let types: Vec<&str> = registry.types.iter().map(|ty| ty.as_str()).collect();
    assert_eq!(types, vec!["app.Marker", "app.Tagged"]);
}

#[test]
fn replacing_a_class_keeps_its_position() {
    let program = sample().with_class(Class::new("app.Base", ClassKind::Class));
    let names: Vec<&str> = program.classes().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["java.lang.Object", "app.Base", "app.Main"]);
    assert_eq!(program.class(&FqName::new("app.Base")).map(|c| c.kind), Some(ClassKind::Class));
}

#[test]
fn interface_abstract_methods_exclude_statics_and_defaults() {
    let body = Body::new(vec![], Stmt::Return(None));
    let iface = Class::new("app.Op", ClassKind::Interface)
        .with_method(Method::new(
            "apply",
            vec![Param::new("x", Type::INT)],
            Type::INT,
            Modifiers::PUBLIC | Modifiers::ABSTRACT,
        ))
        .with_method(void_method("helper").with_body(body.clone()))
        .with_method(
            Method::new("make", vec![], Type::Void, Modifiers::PUBLIC | Modifiers::STATIC)
                .with_body(body),
        );
    let names: Vec<&str> = iface.abstract_methods().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["apply"]);
}

#[test]
fn functional_method_needs_one_abstract_method_and_no_super_interfaces() {
    let apply = || {
        Method::new(
            "apply",
            vec![Param::new("x", Type::INT)],
            Type::INT,
            Modifiers::PUBLIC | Modifiers::ABSTRACT,
        )
    };
    let single = Class::new("app.Op", ClassKind::Interface).with_method(apply());
    assert_eq!(single.functional_method().map(|m| m.name.as_str()), Some("apply"));

    let extended = single.clone().with_interface("app.Base");
    assert!(extended.functional_method().is_none());

    let double = single.with_method(Method::new(
        "other",
        vec![],
        Type::Void,
        Modifiers::PUBLIC | Modifiers::ABSTRACT,
    ));
    assert!(double.functional_method().is_none());

    let class = Class::new("app.Impl", ClassKind::Abstract).with_method(apply());
    assert!(class.functional_method().is_none());
}

#[test]
fn implementing_walks_supertypes_and_super_interfaces() {
    let program = Program::new("app.Impl")
        .with_class(Class::new("app.Fn", ClassKind::Interface).with_interface("all.core.AllFunction"))
        .with_class(Class::new("app.Base", ClassKind::Class).with_interface("app.Fn"))
        .with_class(Class::new("app.Impl", ClassKind::Class).with_super("app.Base"));
    let impl_name = FqName::new("app.Impl");
    assert!(program.is_implementing(&impl_name, "all.core.AllFunction"));
    assert!(program.is_implementing(&impl_name, "app.Fn"));
    assert!(!program.is_implementing(&impl_name, "app.Other"));
    assert!(!program.is_implementing(&FqName::new("app.Missing"), "app.Fn"));
}

#[test]
fn string_values_flatten_lists() {
    let annotation = Annotation::new("x.AddMembers").with_element(
        "value",
        AnnotationValue::List(vec![
            AnnotationValue::Literal(Literal::string("var a:Int;")),
            AnnotationValue::Literal(Literal::string("var b:Int;")),
        ]),
    );
    assert_eq!(
        annotation.string_values("value"),
        vec!["var a:Int;", "var b:Int;"]
    );
    assert!(annotation.string_values("missing").is_empty());
}
