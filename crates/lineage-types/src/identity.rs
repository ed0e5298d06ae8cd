use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Identity of a concrete type (never of an instance).
///
/// A `TypeKey` pairs the compiler's [`TypeId`] with the type's name. Equality
/// and hashing use the `TypeId` only; the name is carried for diagnostics.
/// Two values of the same declared type always yield equal keys, which makes
/// `TypeKey` the key of every registry and cache map in Lineage.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, without generic arguments.
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Returns `true` if this is the key of `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Stable, process-independent fingerprint of this type's name.
    pub fn fingerprint(&self) -> TypeFingerprint {
        TypeFingerprint::of_name(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.short_name())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// BLAKE3 fingerprint of a type name.
///
/// [`TypeId`] values are neither stable across builds nor serializable, so
/// anything that leaves the process (snapshots, logs) refers to types by
/// fingerprint instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeFingerprint([u8; 32]);

impl TypeFingerprint {
    /// Fingerprint a fully qualified type name.
    pub fn of_name(name: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"lineage-type-v1:");
        hasher.update(name.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// First 8 hex characters, enough to tell types apart in logs.
    pub fn short_id(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for TypeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeFingerprint({})", self.short_id())
    }
}

impl fmt::Display for TypeFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_id())
    }
}

/// Interned identifier of a declared behavior.
///
/// Callers name behaviors explicitly; two identifiers are the same behavior
/// exactly when their names are equal. By convention the name is qualified
/// with the declaring type, e.g. `"Shape::area"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BehaviorId(&'static str);

impl BehaviorId {
    /// Create an identifier from its name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The behavior's name.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for BehaviorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BehaviorId({})", self.0)
    }
}

impl fmt::Display for BehaviorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Widget;

    mod nested {
        pub struct Gadget<T>(pub T);
    }

    #[test]
    fn same_type_yields_equal_keys() {
        assert_eq!(TypeKey::of::<Widget>(), TypeKey::of::<Widget>());
        assert_ne!(TypeKey::of::<Widget>(), TypeKey::of::<u32>());
    }

    #[test]
    fn keys_work_as_map_keys() {
        let mut map = HashMap::new();
        map.insert(TypeKey::of::<Widget>(), 1);
        map.insert(TypeKey::of::<String>(), 2);
        assert_eq!(map.get(&TypeKey::of::<Widget>()), Some(&1));
        assert_eq!(map.get(&TypeKey::of::<String>()), Some(&2));
        assert_eq!(map.get(&TypeKey::of::<u8>()), None);
    }

    #[test]
    fn short_name_strips_path_and_generics() {
        assert_eq!(TypeKey::of::<Widget>().short_name(), "Widget");
        assert_eq!(TypeKey::of::<nested::Gadget<Widget>>().short_name(), "Gadget");
        assert_eq!(TypeKey::of::<u64>().short_name(), "u64");
    }

    #[test]
    fn is_checks_identity() {
        let key = TypeKey::of::<Widget>();
        assert!(key.is::<Widget>());
        assert!(!key.is::<u8>());
    }

    #[test]
    fn debug_uses_short_name() {
        assert_eq!(format!("{:?}", TypeKey::of::<Widget>()), "TypeKey(Widget)");
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = TypeKey::of::<Widget>().fingerprint();
        let b = TypeFingerprint::of_name(std::any::type_name::<Widget>());
        assert_eq!(a, b);
        assert_ne!(a, TypeKey::of::<u8>().fingerprint());
    }

    #[test]
    fn fingerprint_short_id_is_a_hex_prefix() {
        let short = TypeKey::of::<Widget>().fingerprint().short_id();
        assert_eq!(short.len(), 8);
        assert!(short.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(format!("{}", TypeKey::of::<Widget>().fingerprint()), short);
    }

    #[test]
    fn fingerprint_serde_roundtrip() {
        let fp = TypeKey::of::<Widget>().fingerprint();
        let json = serde_json::to_string(&fp).unwrap();
        let parsed: TypeFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, parsed);
    }

    #[test]
    fn behavior_ids_compare_by_name() {
        const AREA: BehaviorId = BehaviorId::new("Shape::area");
        assert_eq!(AREA, BehaviorId::new("Shape::area"));
        assert_ne!(AREA, BehaviorId::new("Shape::perimeter"));
        assert_eq!(AREA.to_string(), "Shape::area");
    }
}
