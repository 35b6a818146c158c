use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use super::PatchOp;

#[derive(Clone, Debug)]
enum Entry {
    Value(String),
    Hash(HashMap<String, String>),
    Set(BTreeSet<String>),
    List(Vec<String>),
}

/// In-process document store with the same shape as the redis backend.
/// A single mutex guards the whole map, so one `apply` batch is atomic.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store mutex poisoned"))
    }

    pub fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(None),
            Some(Entry::Value(value)) => Ok(Some(value.clone())),
            Some(_) => Err(wrong_type(key, "value")),
        }
    }

    pub fn hash_all(&self, key: &str) -> anyhow::Result<HashMap<String, String>> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(HashMap::new()),
            Some(Entry::Hash(fields)) => Ok(fields.clone()),
            Some(_) => Err(wrong_type(key, "hash")),
        }
    }

    pub fn set_members(&self, key: &str) -> anyhow::Result<BTreeSet<String>> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(BTreeSet::new()),
            Some(Entry::Set(members)) => Ok(members.clone()),
            Some(_) => Err(wrong_type(key, "set")),
        }
    }

    pub fn list_all(&self, key: &str) -> anyhow::Result<Vec<String>> {
        let entries = self.lock()?;
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(values)) => Ok(values.clone()),
            Some(_) => Err(wrong_type(key, "list")),
        }
    }

    pub fn apply(&self, ops: &[PatchOp]) -> anyhow::Result<()> {
        let mut entries = self.lock()?;
        for op in ops {
            match op {
                PatchOp::HashSet { key, field, value } => {
                    hash_mut(&mut entries, key)?.insert(field.clone(), value.clone());
                }
                PatchOp::HashIncr { key, field, delta } => {
                    let fields = hash_mut(&mut entries, key)?;
                    let current = fields
                        .get(field)
                        .map(|raw| raw.parse::<i64>())
                        .transpose()
                        .map_err(|e| {
                            anyhow::anyhow!("non-numeric field `{field}` at `{key}`: {e}")
                        })?
                        .unwrap_or(0);
                    fields.insert(field.clone(), (current + delta).to_string());
                }
                PatchOp::SetAdd { key, member } => {
                    set_mut(&mut entries, key)?.insert(member.clone());
                }
                PatchOp::SetRemove { key, member } => {
                    set_mut(&mut entries, key)?.remove(member);
                }
                PatchOp::ListPush { key, value } => {
                    list_mut(&mut entries, key)?.push(value.clone());
                }
                PatchOp::Put { key, value } => {
                    entries.insert(key.clone(), Entry::Value(value.clone()));
                }
                PatchOp::Delete { key } => {
                    entries.remove(key);
                }
            }
        }
        Ok(())
    }
}

fn hash_mut<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
) -> anyhow::Result<&'a mut HashMap<String, String>> {
    match entries
        .entry(key.to_owned())
        .or_insert_with(|| Entry::Hash(HashMap::new()))
    {
        Entry::Hash(fields) => Ok(fields),
        _ => Err(wrong_type(key, "hash")),
    }
}

fn set_mut<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
) -> anyhow::Result<&'a mut BTreeSet<String>> {
    match entries
        .entry(key.to_owned())
        .or_insert_with(|| Entry::Set(BTreeSet::new()))
    {
        Entry::Set(members) => Ok(members),
        _ => Err(wrong_type(key, "set")),
    }
}

fn list_mut<'a>(
    entries: &'a mut HashMap<String, Entry>,
    key: &str,
) -> anyhow::Result<&'a mut Vec<String>> {
    match entries
        .entry(key.to_owned())
        .or_insert_with(|| Entry::List(Vec::new()))
    {
        Entry::List(values) => Ok(values),
        _ => Err(wrong_type(key, "list")),
    }
}

fn wrong_type(key: &str, expected: &str) -> anyhow::Error {
    anyhow::anyhow!("key `{key}` holds a different type (expected {expected})")
}
