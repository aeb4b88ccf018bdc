//! Declarative macros for reducing score type boilerplate.
//!
//! These macros generate the repetitive trait implementations that all
//! field-based score types share: arithmetic ops, ordering, match weighting
//! and slash-separated parsing.

/// Generates `PartialOrd`, `Add`, `Sub`, and `Neg` for a field-based score type.
///
/// The constructor must accept fields in the order they are listed.
///
/// # Usage
/// ```ignore
/// impl_score_ops!(HardSoftScore { hard, soft } => of);
/// ```
macro_rules! impl_score_ops {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type::$ctor( $(self.$field + other.$field),+ )
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type::$ctor( $(self.$field - other.$field),+ )
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type::$ctor( $(-self.$field),+ )
            }
        }
    };
}

/// Generates `MatchWeighted` impls for a score whose levels are `i64`.
///
/// ```ignore
/// impl_match_weighted_int!(HardSoftScore { hard, soft } => of);
/// ```
macro_rules! impl_match_weighted_int {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl $crate::score::traits::MatchWeighted<i32> for $type {
            #[inline]
            fn weighted(&self, match_weight: i32) -> Self {
                let w = i64::from(match_weight);
                $type::$ctor( $(self.$field * w),+ )
            }
        }

        impl $crate::score::traits::MatchWeighted<i64> for $type {
            #[inline]
            fn weighted(&self, match_weight: i64) -> Self {
                $type::$ctor( $(self.$field * match_weight),+ )
            }
        }
    };
}

/// Generates `MatchWeighted` impls for a score whose levels are `Decimal`.
///
/// Integer match weights are widened to `Decimal` before multiplying.
macro_rules! impl_match_weighted_decimal {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl $crate::score::traits::MatchWeighted<i32> for $type {
            #[inline]
            fn weighted(&self, match_weight: i32) -> Self {
                let w = rust_decimal::Decimal::from(match_weight);
                $type::$ctor( $(self.$field * w),+ )
            }
        }

        impl $crate::score::traits::MatchWeighted<i64> for $type {
            #[inline]
            fn weighted(&self, match_weight: i64) -> Self {
                let w = rust_decimal::Decimal::from(match_weight);
                $type::$ctor( $(self.$field * w),+ )
            }
        }

        impl $crate::score::traits::MatchWeighted<rust_decimal::Decimal> for $type {
            #[inline]
            fn weighted(&self, match_weight: rust_decimal::Decimal) -> Self {
                $type::$ctor( $(self.$field * match_weight),+ )
            }
        }
    };
}

/// Generates `ParseableScore` impl for scores using the `"Xsuffix/Ysuffix"` format.
///
/// Each field maps to a suffix label (e.g., `hard => "hard"`, `soft => "soft"`)
/// and every part is parsed as the given level type.
///
/// # Usage
/// ```ignore
/// impl_score_parse!(HardSoftScore { hard => "hard", soft => "soft" }: i64 => of);
/// impl_score_parse!(HardSoftDecimalScore { hard => "hard", soft => "soft" }: Decimal => of);
/// ```
macro_rules! impl_score_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ }: $level:ty => $ctor:ident) => {
        impl $crate::score::traits::ParseableScore for $type {
            fn parse(s: &str) -> Result<Self, $crate::score::traits::ScoreParseError> {
                let s = s.trim();
                let parts: Vec<&str> = s.split('/').collect();
                let suffixes: &[&str] = &[ $($suffix),+ ];
                let count = suffixes.len();

                if parts.len() != count {
                    return Err($crate::score::traits::ScoreParseError::new(format!(
                        "Invalid {} format '{}': expected {} parts separated by '/'",
                        stringify!($type), s, count
                    )));
                }

                let mut _idx = 0usize;
                $(
                    let $field = {
                        let part = parts[_idx].trim();
                        let num_str = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "{} part '{}' must end with '{}'",
                                stringify!($field), part, $suffix
                            ))
                        })?;
                        let val = num_str.parse::<$level>().map_err(|e| {
                            $crate::score::traits::ScoreParseError::new(format!(
                                "Invalid {} score '{}': {}",
                                $suffix, num_str, e
                            ))
                        })?;
                        _idx += 1;
                        val
                    };
                )+

                Ok($type::$ctor( $($field),+ ))
            }

            fn to_string_repr(&self) -> String {
                let parts: Vec<String> = vec![
                    $( format!("{}{}", self.$field, $suffix) ),+
                ];
                parts.join("/")
            }
        }
    };
}
