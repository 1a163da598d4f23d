use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};
use std::{fmt, marker::PhantomData};

/// Entries of a JSON object in document order.
///
/// Unlike a map, repeated keys are all kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEntries<Value>(pub Vec<(String, Value)>);

impl<Value> Default for OrderedEntries<Value> {
    fn default() -> Self {
        OrderedEntries(Vec::new())
    }
}

impl<Value> OrderedEntries<Value> {
    /// Iterate over the entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&'_ str, &'_ Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

struct EntriesVisitor<Value>(PhantomData<Value>);

impl<'de, Value> Visitor<'de> for EntriesVisitor<Value>
where
    Value: Deserialize<'de>,
{
    type Value = OrderedEntries<Value>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<Access>(self, mut access: Access) -> Result<Self::Value, Access::Error>
    where
        Access: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(entry) = access.next_entry::<String, Value>()? {
            entries.push(entry);
        }
        Ok(OrderedEntries(entries))
    }
}

impl<'de, Value> Deserialize<'de> for OrderedEntries<Value>
where
    Value: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}
