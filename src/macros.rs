/// Declares one or more `String`-backed newtypes with the boilerplate
/// (`Display`, `from_str`-style construction, hashing) the registry and
/// combat layers need for identifiers that are authored as plain strings
/// in JSON. Mirrors the teacher crate's `id_newtypes!`.
macro_rules! id_newtypes {
    ($($name:ident),+ $(,)?) => {
        $(
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name(String);

            impl $name {
                pub fn new(s: impl Into<String>) -> Self {
                    $name(s.into())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    $name::new(s)
                }
            }

            impl From<String> for $name {
                fn from(s: String) -> Self {
                    $name::new(s)
                }
            }

            impl serde::Serialize for $name {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.serialize_str(&self.0)
                }
            }

            impl<'de> serde::Deserialize<'de> for $name {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: serde::Deserializer<'de>,
                {
                    String::deserialize(deserializer).map($name)
                }
            }
        )+
    };
}

pub(crate) use id_newtypes;
