//! Generates the string-backed ID newtypes.

/// `prefixed_id!(StreamId => "stream")` gives `StreamId::new()` producing
/// `stream-<uuid>`, plus `as_str`, `Display` and `From<&str>`.
macro_rules! prefixed_id {
    ($($name:ident => $prefix:literal),* $(,)?) => {
        $(
            impl $name {
                pub fn new() -> Self {
                    Self(format!("{}-{}", $prefix, uuid::Uuid::new_v4().simple()))
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl Default for $name {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    Self(s.to_owned())
                }
            }
        )*
    };
}

pub(crate) use prefixed_id;
