use std::{cmp::Ordering, fmt::{self, Debug, Display}};

use serde::{Deserialize, Serialize};

/// Structure to store ranked results
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Hits<K> {
    /// (Document key, Score)
    pub list: Vec<(K, f64)>,
}

impl<K> Hits<K> {
    /// Create a new Hits instance
    pub fn new(vec: Vec<(K, f64)>) -> Self {
        Hits { list: vec }
    }

    /// Sort results by descending score
    /// Stable: equal scores keep their current relative order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|(_, s)| !s.is_nan());
        self.list
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        self
    }

    /// Keep only the first `n` entries
    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    /// Replace every key, keeping scores and order
    pub fn map_keys<T, F>(self, mut f: F) -> Hits<T>
    where
        F: FnMut(K) -> T,
    {
        Hits {
            list: self.list.into_iter().map(|(k, s)| (f(k), s)).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> + '_ {
        self.list.iter().map(|(k, s)| (k, *s))
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each hit on a new line
            writeln!(f, "Hits [")?;
            for (key, score) in self.iter() {
                writeln!(f, "    {:?}: {:.6}", key, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// One line per hit: `Title (Similarity: 0.83)`
impl<K> Display for Hits<K>
where
    K: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, score)) in self.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} (Similarity: {:.2})", key, score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_is_descending_and_stable() {
        let mut hits = Hits::new(vec![
            ("a", 0.1),
            ("b", 0.5),
            ("c", 0.1),
            ("d", f64::NAN),
            ("e", 0.5),
            ("f", 0.0),
        ]);
        hits.sort_by_score();
        assert_eq!(hits.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec!["b", "e", "a", "c", "f"]);
    }

    #[test]
    fn truncate_and_map_keys() {
        let titles = ["zero", "one", "two"];
        let mut hits = Hits::new(vec![(2usize, 0.9), (0, 0.4), (1, 0.2)]);
        hits.truncate(2);
        let hits = hits.map_keys(|i| titles[i]);
        assert_eq!(hits.list, vec![("two", 0.9), ("zero", 0.4)]);
    }

    #[test]
    fn display_uses_two_decimals() {
        let hits = Hits::new(vec![("Tenet".to_string(), 0.70812), ("The Matrix".to_string(), 0.379)]);
        assert_eq!(
            hits.to_string(),
            "Tenet (Similarity: 0.71)\nThe Matrix (Similarity: 0.38)"
        );
    }

    #[test]
    fn debug_alternate_lists_each_hit() {
        let hits = Hits::new(vec![("a", 1.0)]);
        let s = format!("{:#?}", hits);
        assert!(s.starts_with("Hits ["));
        assert!(s.contains("\"a\": 1.000000"));
    }
}
