// Struct table types
//
// Produced by the extractors, finalized by the package resolver and consumed
// read-only by the generators.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// One structure member.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Declared type exactly as written in the source file
    pub type_text: String,
    /// Declaration order inside the struct (rendering order)
    pub index: usize,
    pub is_public: bool,

    pub getter_name: String,
    /// A method or field with the getter's name is already declared
    pub getter_already_exists: bool,
    pub will_generate_getter: bool,

    pub setter_name: String,
    pub setter_already_exists: bool,
    pub will_generate_setter: bool,

    pub ignore_reason: Option<String>,
}

pub type Fields = BTreeMap<String, Field>;

/// One structure type declaration.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Struct {
    pub name: String,
    /// Receiver alias used inside generated methods
    pub short_name: String,
    pub lower_name: String,
    /// Type parameter names of a generic struct, in declaration order
    pub type_params: Vec<String>,
    /// Found while scanning (false means requested but absent)
    pub is_present: bool,
    pub public_fields: Fields,
    pub private_fields: Fields,
    pub ignore_fields: Fields,
    /// Import declarations of the declaring file, verbatim
    pub imported_statements: String,
    /// File the struct was declared in
    pub file: PathBuf,
}

/// Package scan result keyed by struct name.
pub type Structs = BTreeMap<String, Struct>;

/// Method names already declared, keyed by receiver base type name.
pub type DeclaredMethods = BTreeMap<String, BTreeSet<String>>;

impl Struct {
    /// Receiver type as written in a method declaration: `Box` or `Box[K, V]`.
    pub fn receiver_type(&self) -> String {
        if self.type_params.is_empty() {
            self.name.clone()
        } else {
            format!("{}[{}]", self.name, self.type_params.join(", "))
        }
    }

    pub fn field_count(&self) -> usize {
        self.public_fields.len() + self.private_fields.len() + self.ignore_fields.len()
    }

    /// Private fields in declaration order.
    pub fn private_fields_in_order(&self) -> Vec<&Field> {
        let mut fields: Vec<&Field> = self.private_fields.values().collect();
        fields.sort_by_key(|f| f.index);
        fields
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.public_fields.contains_key(name)
            || self.private_fields.contains_key(name)
            || self.ignore_fields.contains_key(name)
    }

    /// Clear generation flags for accessors whose name is already taken.
    ///
    /// A name is taken by a field of this struct, by a method declared on it,
    /// or by an accessor of an earlier private field (in declaration order).
    /// Getter and setter names are both reserved whatever kinds this run
    /// generates, so separate `getter` and `setter` runs agree.
    pub fn mark_existing_accessors(&mut self, methods: &DeclaredMethods) {
        let declared = methods.get(&self.name);
        let mut reserved: BTreeSet<String> = BTreeSet::new();

        let mut getter_taken = Vec::new();
        let mut setter_taken = Vec::new();
        for field in self.private_fields_in_order() {
            for (accessor, taken) in [
                (&field.getter_name, &mut getter_taken),
                (&field.setter_name, &mut setter_taken),
            ] {
                if accessor.is_empty() {
                    continue;
                }
                let clash = self.has_field(accessor)
                    || declared.is_some_and(|m| m.contains(accessor.as_str()))
                    || reserved.contains(accessor.as_str());
                if clash {
                    taken.push(field.name.clone());
                } else {
                    reserved.insert(accessor.clone());
                }
            }
        }

        for name in getter_taken {
            if let Some(field) = self.private_fields.get_mut(&name) {
                tracing::debug!(
                    "{}.{}: getter {} already exists, skipping",
                    self.name,
                    field.name,
                    field.getter_name
                );
                field.getter_already_exists = true;
                field.will_generate_getter = false;
            }
        }
        for name in setter_taken {
            if let Some(field) = self.private_fields.get_mut(&name) {
                tracing::debug!(
                    "{}.{}: setter {} already exists, skipping",
                    self.name,
                    field.name,
                    field.setter_name
                );
                field.setter_already_exists = true;
                field.will_generate_setter = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private_field(name: &str, getter: &str, setter: &str, index: usize) -> Field {
        Field {
            name: name.to_string(),
            type_text: "int".to_string(),
            index,
            getter_name: getter.to_string(),
            will_generate_getter: true,
            setter_name: setter.to_string(),
            will_generate_setter: true,
            ..Default::default()
        }
    }

    fn sample() -> Struct {
        let mut s = Struct {
            name: "Point".to_string(),
            short_name: "p".to_string(),
            lower_name: "point".to_string(),
            is_present: true,
            ..Default::default()
        };
        s.private_fields
            .insert("y".to_string(), private_field("y", "Y", "SetY", 1));
        s.private_fields
            .insert("x".to_string(), private_field("x", "X", "SetX", 0));
        s.public_fields.insert(
            "X".to_string(),
            Field {
                name: "X".to_string(),
                is_public: true,
                index: 2,
                ..Default::default()
            },
        );
        s
    }

    #[test]
    fn test_receiver_type() {
        let mut s = sample();
        assert_eq!(s.receiver_type(), "Point");
        s.type_params = vec!["K".to_string(), "V".to_string()];
        assert_eq!(s.receiver_type(), "Point[K, V]");
    }

    #[test]
    fn test_private_fields_in_declaration_order() {
        let s = sample();
        let names: Vec<&str> = s
            .private_fields_in_order()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_mark_existing_accessors() {
        let mut s = sample();
        let mut methods = DeclaredMethods::new();
        methods.insert(
            "Point".to_string(),
            ["SetY".to_string()].into_iter().collect(),
        );

        s.mark_existing_accessors(&methods);

        let x = &s.private_fields["x"];
        assert!(
            x.getter_already_exists && !x.will_generate_getter,
            "getter X collides with exported field X"
        );
        assert!(x.will_generate_setter);

        let y = &s.private_fields["y"];
        assert!(y.will_generate_getter);
        assert!(
            y.setter_already_exists && !y.will_generate_setter,
            "SetY is already declared on Point"
        );
    }

    #[test]
    fn test_mark_existing_accessors_ignores_other_receivers() {
        let mut s = sample();
        s.public_fields.clear();
        let mut methods = DeclaredMethods::new();
        methods.insert("Other".to_string(), ["X".to_string()].into_iter().collect());

        s.mark_existing_accessors(&methods);

        assert!(s.private_fields["x"].will_generate_getter);
        assert!(!s.private_fields["x"].getter_already_exists);
    }

    #[test]
    fn test_accessor_names_reserved_across_fields() {
        let mut s = Struct {
            name: "A".to_string(),
            short_name: "a".to_string(),
            is_present: true,
            ..Default::default()
        };
        s.private_fields
            .insert("x".to_string(), private_field("x", "X", "SetX", 0));
        s.private_fields
            .insert("setX".to_string(), private_field("setX", "SetX", "SetSetX", 1));

        s.mark_existing_accessors(&DeclaredMethods::new());

        let x = &s.private_fields["x"];
        assert!(x.will_generate_getter && x.will_generate_setter);
        assert!(!x.setter_already_exists, "the first field keeps SetX");

        let set_x = &s.private_fields["setX"];
        assert!(
            set_x.getter_already_exists && !set_x.will_generate_getter,
            "getter SetX is already the setter of x"
        );
        assert!(set_x.will_generate_setter);
    }

    #[test]
    fn test_reservation_ignores_which_kinds_are_generated() {
        let mut s = Struct {
            name: "A".to_string(),
            ..Default::default()
        };
        let mut x = private_field("x", "X", "SetX", 0);
        x.will_generate_setter = false;
        s.private_fields.insert("x".to_string(), x);
        s.private_fields
            .insert("setX".to_string(), private_field("setX", "SetX", "SetSetX", 1));

        s.mark_existing_accessors(&DeclaredMethods::new());

        assert!(
            !s.private_fields["setX"].will_generate_getter,
            "a getter-only run must not claim the name a setter run would write"
        );
    }
}
