use lineage_registry::{composable, Root};

#[derive(Clone, Debug, Default)]
pub struct Base {
    pub root: Root,
    pub val: i32,
}

impl Base {
    pub fn with_val(val: i32) -> Self {
        Self {
            root: Root::new(),
            val,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Derived {
    pub base: Base,
    pub extra: String,
}

#[derive(Clone, Debug)]
pub struct DeepDerived {
    pub derived: Derived,
    pub depth: u8,
}

#[derive(Clone, Debug)]
pub struct Other {
    pub base: Base,
}

/// Starts with a plain `u64`.
#[derive(Clone, Debug)]
pub struct Tagged {
    pub tag: u64,
}

#[derive(Clone, Debug)]
pub struct Empty;

composable!(Base: root => Root);
composable!(Derived: base => Base);
composable!(DeepDerived: derived => Derived);
composable!(Other: base => Base);
composable!(Tagged: plain u64);
composable!(Empty: empty);

pub fn derived(val: i32, extra: &str) -> Derived {
    Derived {
        base: Base::with_val(val),
        extra: extra.to_string(),
    }
}

pub fn deep(val: i32) -> DeepDerived {
    DeepDerived {
        derived: derived(val, "deep"),
        depth: 2,
    }
}
