#[allow(unused_macros)]
#[macro_export]
macro_rules! btreeset {
    () => (
        std::collections::BTreeSet::new()
    );
    ($($x:expr),+ $(,)?) => ({
        let mut x = std::collections::BTreeSet::new();
        $(
            x.insert($x);
        )*
        x
    });
}

#[allow(unused_macros)]
#[macro_export]
macro_rules! btreemap {
    () => (
        std::collections::BTreeMap::new()
    );
    ($(($k:expr, $v:expr)),+ $(,)?) => ({
        let mut x = std::collections::BTreeMap::new();
        $(
            x.insert($k, $v);
        )*
        x
    });
}

/// Build a set-attrs request from attribute names and values.
#[macro_export]
macro_rules! set_attrs {
    ($(($k:expr, $v:expr)),* $(,)?) => ({
        let mut x: std::collections::BTreeMap<
            adminacl_proto::attribute::Attribute,
            Vec<String>,
        > = std::collections::BTreeMap::new();
        $(
            x.entry(adminacl_proto::attribute::Attribute::from($k))
                .or_default()
                .push(String::from($v));
        )*
        $crate::right::Right::SetAttrs(x)
    });
}

/// Build a get-attrs request from attribute names.
#[macro_export]
macro_rules! get_attrs {
    ($($k:expr),* $(,)?) => ({
        let mut x: std::collections::BTreeSet<adminacl_proto::attribute::Attribute> =
            std::collections::BTreeSet::new();
        $(
            x.insert(adminacl_proto::attribute::Attribute::from($k));
        )*
        $crate::right::Right::GetAttrs(x)
    });
}

/// Run a point check on an engine and compare the outcome. `$expect` is either
/// `Ok(())` or `Err(reason)`, where `reason` is the expected denial message.
#[cfg(test)]
macro_rules! test_acl_check {
    ($engine:expr, $check:ident, $target:expr, $right:expr, $expect:expr) => {{
        let res = $engine.$check(&$target, &$right);
        match $expect {
            Ok(()) => assert_eq!(res, Ok(()), "{} on {}", stringify!($check), $target),
            Err(reason) => match res {
                Err($crate::prelude::OperationError::PermissionDenied(msg)) => {
                    assert_eq!(msg, reason)
                }
                other => panic!("expected denial \"{}\", got {:?}", reason, other),
            },
        }
    }};
}
