/// Configuration macros for single-declaration config sections
///
/// `config_struct!` defines a section struct, its serde support and its
/// `Default` implementation from one list of `field: Type = default` entries.

/// Define a configuration struct with embedded defaults
///
/// # Example
/// ```
/// walletscan::config_struct! {
///     pub struct PollerSection {
///         enabled: bool = true,
///         interval_secs: u64 = 4,
///     }
/// }
///
/// let section = PollerSection::default();
/// assert_eq!(section.interval_secs, 4);
/// ```
///
/// Missing keys in a TOML file fall back to the declared default
/// (`#[serde(default)]` on the struct).
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
