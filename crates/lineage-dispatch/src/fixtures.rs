use lineage_registry::{composable, Behavior, Receiver, ReceiverMut, Root};

pub const DESCRIBE: Behavior<(), (String,)> = Behavior::new("Base::describe");
pub const ADD: Behavior<(i32, i32), (i32,)> = Behavior::new("Base::add");
pub const BUMP: Behavior<(i32,), (i32,)> = Behavior::new("Base::bump");
pub const SPLIT: Behavior<(char,), (String, String)> = Behavior::new("Derived::split");
pub const SUM7: Behavior<(u8, u8, u8, u8, u8, u8, u8), (u32,)> = Behavior::new("Base::sum7");
pub const STATS: Behavior<(), (i32, usize, bool, String)> = Behavior::new("Derived::stats");
pub const RESET: Behavior<(), ()> = Behavior::new("Base::reset");

/// Overridden by `Derived`; `TEMPLATE` and `STEP` call it from `Base`.
pub const HOOK: Behavior<(), (String,)> = Behavior::new("Base::hook");
pub const TEMPLATE: Behavior<(), (String,)> = Behavior::new("Base::template");
pub const STEP: Behavior<(i32,), (i32,)> = Behavior::new("Base::step");
/// A shared body calling the exclusive `RESET`.
pub const PEEK_RESET: Behavior<(), ()> = Behavior::new("Base::peek_reset");

/// Never implemented by any fixture.
pub const FLY: Behavior<(), ()> = Behavior::new("Base::fly");

#[derive(Clone, Debug, Default)]
pub struct Base {
    pub root: Root,
    pub val: i32,
}

#[derive(Clone, Debug)]
pub struct Derived {
    pub base: Base,
    pub extra: String,
}

#[derive(Clone, Debug)]
pub struct DeepDerived {
    pub derived: Derived,
}

#[derive(Clone, Debug)]
pub struct Other {
    pub base: Base,
}

composable!(Base: root => Root, |methods| {
    methods
        .define(&DESCRIBE, |base: &Base, ()| (format!("base {}", base.val),))
        .define(&ADD, |base: &Base, (a, b)| (base.val + a + b,))
        .define_mut(&BUMP, |base: &mut Base, (by,)| {
            base.val += by;
            (base.val,)
        })
        .define(&SUM7, |_: &Base, (a, b, c, d, e, f, g)| {
            ([a, b, c, d, e, f, g].iter().map(|v| u32::from(*v)).sum::<u32>(),)
        })
        .define(&HOOK, |_: &Base, ()| ("base hook".to_string(),))
        .define_mut(&RESET, |base: &mut Base, ()| base.val = 0)
        .define_with(&TEMPLATE, |base: Receiver<'_, Base>, ()| {
            let (hook,) = base.invoke(&HOOK, ())?;
            Ok((format!("{} via {hook}", base.val),))
        })
        .define_mut_with(&STEP, |mut base: ReceiverMut<'_, Base>, (by,)| {
            base.invoke(&RESET, ())?;
            base.val += by;
            Ok((base.val,))
        })
        .define_with(&PEEK_RESET, |base: Receiver<'_, Base>, ()| base.invoke(&RESET, ()));
});

composable!(Derived: base => Base, |methods| {
    methods
        .define(&DESCRIBE, |derived: &Derived, ()| {
            (format!("derived {} {}", derived.base.val, derived.extra),)
        })
        .define(&SPLIT, |derived: &Derived, (at,)| {
            let (head, tail) = derived
                .extra
                .split_once(at)
                .unwrap_or((derived.extra.as_str(), ""));
            (head.to_string(), tail.to_string())
        })
        .define(&STATS, |derived: &Derived, ()| {
            (
                derived.base.val,
                derived.extra.len(),
                derived.extra.is_empty(),
                derived.extra.clone(),
            )
        })
        .define(&HOOK, |derived: &Derived, ()| (format!("derived hook {}", derived.extra),))
        .define_mut(&RESET, |derived: &mut Derived, ()| {
            derived.base.val = 0;
            derived.extra.clear();
        });
});

composable!(DeepDerived: derived => Derived);

composable!(Other: base => Base, |methods| {
    methods.define(&DESCRIBE, |other: &Other, ()| (format!("other {}", other.base.val),));
});

pub fn base(val: i32) -> Base {
    Base {
        root: Root::new(),
        val,
    }
}

pub fn derived(val: i32, extra: &str) -> Derived {
    Derived {
        base: base(val),
        extra: extra.to_string(),
    }
}
