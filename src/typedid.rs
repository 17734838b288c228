use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Serialize};

pub trait TypedIdMarker {
    fn tag() -> &'static str;
}

/// Surrogate-key newtype. The database assigns the raw value; the marker
/// keeps campaign, employee and event keys from being mixed up at compile
/// time. Serializes as the bare integer the dashboard expects.
pub struct TypedId<T: TypedIdMarker>(i64, PhantomData<T>);

impl<T: TypedIdMarker> TypedId<T> {
    pub fn from_raw(raw: i64) -> TypedId<T> {
        TypedId(raw, PhantomData)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl<T: TypedIdMarker> Copy for TypedId<T> {}

impl<T: TypedIdMarker> Clone for TypedId<T> {
    fn clone(&self) -> TypedId<T> {
        *self
    }
}

impl<T: TypedIdMarker> PartialEq for TypedId<T> {
    fn eq(&self, other: &TypedId<T>) -> bool {
        self.0 == other.0
    }
}

impl<T: TypedIdMarker> Eq for TypedId<T> {}

impl<T: TypedIdMarker> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T: TypedIdMarker> Display for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

impl<T: TypedIdMarker> Debug for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}-{}", T::tag(), self.0)
    }
}

impl<T: TypedIdMarker> FromStr for TypedId<T> {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TypedId(s.parse()?, PhantomData))
    }
}

impl<T: TypedIdMarker> Serialize for TypedId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de, T: TypedIdMarker> Deserialize<'de> for TypedId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IdVisitor;

        impl<'de> serde::de::Visitor<'de> for IdVisitor {
            type Value = i64;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an integer id")
            }

            fn visit_i64<E: DeError>(self, v: i64) -> Result<i64, E> {
                Ok(v)
            }

            fn visit_u64<E: DeError>(self, v: u64) -> Result<i64, E> {
                i64::try_from(v).map_err(|_| E::custom("id out of range"))
            }

            fn visit_str<E: DeError>(self, v: &str) -> Result<i64, E> {
                v.parse().map_err(E::custom)
            }
        }

        let raw = deserializer.deserialize_i64(IdVisitor)?;
        Ok(TypedId(raw, PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::CampaignId;

    #[test]
    fn serializes_as_bare_integer() {
        let id = CampaignId::from_raw(17);
        assert_eq!(serde_json::to_string(&id).unwrap(), "17");
    }

    #[test]
    fn parses_from_path_segment() {
        let id: CampaignId = "42".parse().unwrap();
        assert_eq!(id.value(), 42);
        assert!("not-a-number".parse::<CampaignId>().is_err());
    }

    #[test]
    fn debug_output_carries_the_tag() {
        let id = CampaignId::from_raw(3);
        assert_eq!(format!("{:?}", id), "CPN-3");
    }
}
