//! Shared test types: `Puppy -> Dog -> Animal -> Root` and `Cat -> Animal`.

use std::sync::Arc;

use crate::{
    composable, Behavior, BehaviorId, LineageError, LineageResult, MethodEntry, Receiver,
    ReceiverMut, Resolver, Root, TypeMetadata,
};

pub const SPEAK: Behavior<(u32,), (String,)> = Behavior::new("Animal::speak");
pub const LEGS: Behavior<(), (u8,)> = Behavior::new("Animal::legs");
pub const RENAME: Behavior<(String,), ()> = Behavior::new("Animal::rename");
/// Calls `SPEAK` on its own object.
pub const INTRO: Behavior<(), (String,)> = Behavior::new("Animal::intro");
/// Calls `RENAME`, then `SPEAK`, under one exclusive borrow.
pub const RETIRE: Behavior<(String,), (String,)> = Behavior::new("Animal::retire");

/// Resolves by walking the chain on every call.
pub struct WalkResolver;

impl Resolver for WalkResolver {
    fn resolve(
        &self,
        metadata: &TypeMetadata,
        behavior: BehaviorId,
    ) -> LineageResult<Arc<MethodEntry>> {
        metadata
            .find(behavior)
            .ok_or(LineageError::BehaviorNotFound {
                behavior: behavior.name(),
                real_type: metadata.key().name(),
            })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Animal {
    pub root: Root,
    pub name: String,
}

impl Animal {
    pub fn named(name: &str) -> Self {
        Self {
            root: Root::new(),
            name: name.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Dog {
    pub animal: Animal,
    pub breed: String,
}

#[derive(Clone, Debug)]
pub struct Puppy {
    pub dog: Dog,
    pub age: u32,
}

#[derive(Clone, Debug)]
pub struct Cat {
    pub animal: Animal,
    pub lives: u8,
}

/// Has no root marker.
#[derive(Clone, Debug)]
pub struct Orphan {
    pub id: u32,
}

composable!(Animal: root => Root, |methods| {
    methods
        .define(&SPEAK, |animal: &Animal, (times,)| {
            (format!("{}: {}", animal.name, vec!["..."; times as usize].join(" ")),)
        })
        .define(&LEGS, |_: &Animal, ()| (4,))
        .define_mut(&RENAME, |animal: &mut Animal, (name,)| {
            animal.name = name;
        })
        .define_with(&INTRO, |animal: Receiver<'_, Animal>, ()| {
            let (line,) = animal.invoke(&SPEAK, (1,))?;
            Ok((format!("hello, {line}"),))
        })
        .define_mut_with(&RETIRE, |mut animal: ReceiverMut<'_, Animal>, (name,)| {
            animal.invoke(&RENAME, (name,))?;
            animal.name.push('!');
            animal.invoke(&SPEAK, (2,))
        });
});

composable!(Dog: animal => Animal, |methods| {
    methods.define(&SPEAK, |dog: &Dog, (times,)| {
        (format!("{}: {}", dog.animal.name, vec!["woof"; times as usize].join(" ")),)
    });
});

composable!(Puppy: dog => Dog);
composable!(Cat: animal => Animal);
composable!(Orphan: plain u32);
