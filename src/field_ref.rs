//! Dotted field paths such as `"a.b.0.c"`.
//!
//! A [`FieldRef`] splits a path on `.` into parts and lets callers edit the parts individually.
//! Edited parts are kept on the side rather than rewriting the dotted string each time; the
//! dotted form is rebuilt lazily when it is next asked for, or eagerly with
//! [`FieldRef::reserialize`].
//!
//! ```
//! use bson_builder::FieldRef;
//!
//! let mut path = FieldRef::new("a.b.c");
//! path.set_part(1, "x");
//! path.append_part("0");
//! assert_eq!(path.dotted_field(), "a.x.c.0");
//! assert!(FieldRef::new("a.x").is_prefix_of(&path));
//! assert_eq!(path.numeric_path_components(0).into_iter().collect::<Vec<_>>(), vec![3]);
//! ```

use std::{
    cmp::Ordering,
    collections::BTreeSet,
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::OnceLock,
};

use smallvec::SmallVec;

/// Paths with up to this many parts do not allocate for their part list.
const INLINE_PARTS: usize = 4;

#[derive(Clone, Debug)]
enum Part {
    /// A range of the cached dotted string.
    View { offset: usize, len: usize },

    /// A part set or appended since the dotted string was last built.
    Owned(String),
}

/// A parsed, editable dotted field path.
///
/// Parsing never fails: empty parts are kept as they are, so `"a..b"` has three parts, the
/// middle one empty, and `"a."` has two. The empty string has no parts at all.
///
/// Equality, ordering and hashing compare parts, never the dotted text.
#[derive(Clone, Default)]
pub struct FieldRef {
    /// The path as of the last parse or reserialization.
    dotted: String,
    parts: SmallVec<[Part; INLINE_PARTS]>,

    /// How many leading parts `dotted` accounts for.
    cached_size: usize,

    /// The joined path, built on demand while `dotted` is stale.
    joined: OnceLock<String>,
}

impl FieldRef {
    pub fn new(path: &str) -> Self {
        let mut field = Self::default();
        field.parse(path);
        field
    }

    /// Replaces the contents with the parts of `path`.
    pub fn parse(&mut self, path: &str) {
        self.clear();
        if path.is_empty() {
            return;
        }

        self.dotted = path.to_string();
        let mut offset = 0;
        for part in path.split('.') {
            self.parts.push(Part::View {
                offset,
                len: part.len(),
            });
            offset += part.len() + 1;
        }
        self.cached_size = self.parts.len();
    }

    /// Removes every part.
    pub fn clear(&mut self) {
        self.dotted.clear();
        self.parts.clear();
        self.cached_size = 0;
        self.joined = OnceLock::new();
    }

    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The `i`th part.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn get_part(&self, i: usize) -> &str {
        assert!(
            i < self.parts.len(),
            "part {} of a path with {} parts",
            i,
            self.parts.len()
        );
        self.part(&self.parts[i])
    }

    fn part<'a>(&'a self, part: &'a Part) -> &'a str {
        match part {
            Part::View { offset, len } => &self.dotted[*offset..(*offset + *len)],
            Part::Owned(s) => s,
        }
    }

    /// Iterates over the parts in order.
    pub fn parts(&self) -> impl Iterator<Item = &str> + '_ {
        self.parts.iter().map(move |part| self.part(part))
    }

    /// Replaces the `i`th part.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn set_part(&mut self, i: usize, part: &str) {
        assert!(
            i < self.parts.len(),
            "part {} of a path with {} parts",
            i,
            self.parts.len()
        );
        self.parts[i] = Part::Owned(part.to_string());
        self.joined = OnceLock::new();
    }

    pub fn append_part(&mut self, part: &str) {
        self.parts.push(Part::Owned(part.to_string()));
        self.joined = OnceLock::new();
    }

    /// Removes the last part, if any.
    pub fn remove_last_part(&mut self) {
        if self.parts.pop().is_some() {
            self.joined = OnceLock::new();
        }
    }

    /// Removes the first part, if any, shifting the others down.
    pub fn remove_first_part(&mut self) {
        if !self.parts.is_empty() {
            self.parts.remove(0);
            self.joined = OnceLock::new();
        }
    }

    /// The number of parts that were set or appended since the last parse or reserialization.
    pub fn num_replaced(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, Part::Owned(_)))
            .count()
    }

    fn is_reconciled(&self) -> bool {
        self.parts.len() == self.cached_size
            && self.parts.iter().all(|part| matches!(part, Part::View { .. }))
    }

    fn join(&self) -> String {
        let mut joined = String::with_capacity((self.parts.len() * 2).saturating_sub(1));
        for (i, part) in self.parts().enumerate() {
            if i > 0 {
                joined.push('.');
            }
            joined.push_str(part);
        }
        joined
    }

    /// The dotted form of the current parts.
    fn joined(&self) -> &str {
        if self.is_reconciled() {
            &self.dotted
        } else {
            self.joined.get_or_init(|| self.join())
        }
    }

    /// Rebuilds the dotted string from the current parts so that every part is again a range
    /// of it.
    pub fn reserialize(&mut self) {
        if self.is_reconciled() {
            return;
        }

        self.dotted = match self.joined.take() {
            Some(joined) => joined,
            None => self.join(),
        };

        let mut offset = 0;
        for part in self.parts.iter_mut() {
            let len = match part {
                Part::View { len, .. } => *len,
                Part::Owned(s) => s.len(),
            };
            *part = Part::View { offset, len };
            offset += len + 1;
        }
        self.cached_size = self.parts.len();
    }

    /// The whole path in dotted form.
    pub fn dotted_field(&self) -> &str {
        self.dotted_substring(0, self.num_parts())
    }

    /// The path in dotted form, starting at part `start`.
    pub fn dotted_field_from(&self, start: usize) -> &str {
        self.dotted_substring(start, self.num_parts())
    }

    /// Parts `start..end` in dotted form. Empty if the range is empty or out of bounds.
    pub fn dotted_substring(&self, start: usize, end: usize) -> &str {
        let size = self.num_parts();
        if size == 0 || start >= end || end > size {
            return "";
        }

        let dotted = self.joined();
        if start == 0 && end == size {
            return dotted;
        }

        let lens: SmallVec<[usize; INLINE_PARTS]> = self.parts().map(str::len).collect();
        let start_char: usize = lens[..start].iter().map(|len| len + 1).sum();
        let mut end_char = start_char + lens[start..end].iter().map(|len| len + 1).sum::<usize>();
        if end != size {
            end_char -= 1;
        }
        &dotted[start_char..end_char.min(dotted.len())]
    }

    /// Whether `other` spells exactly this path. Always false for an empty path.
    pub fn equals_dotted_field(&self, other: &str) -> bool {
        let mut rest = other;
        let last = self.num_parts().wrapping_sub(1);

        for (i, part) in self.parts().enumerate() {
            let Some(after) = rest.strip_prefix(part) else {
                return false;
            };
            if i == last {
                return after.is_empty();
            }
            match after.strip_prefix('.') {
                Some(after) => rest = after,
                None => return false,
            }
        }

        false
    }

    /// Whether this path is a strict, non-empty prefix of `other`.
    pub fn is_prefix_of(&self, other: &FieldRef) -> bool {
        let size = self.num_parts();
        if size == 0 || size >= other.num_parts() {
            return false;
        }
        self.common_prefix_size(other) == size
    }

    pub fn is_prefix_of_or_equal_to(&self, other: &FieldRef) -> bool {
        self.is_prefix_of(other) || self == other
    }

    /// The number of leading parts the two paths have in common. Parts are compared up to and
    /// including the last index of the shorter path.
    pub fn common_prefix_size(&self, other: &FieldRef) -> usize {
        if self.is_empty() || other.is_empty() {
            return 0;
        }

        let max_prefix_size = (self.num_parts() - 1).min(other.num_parts() - 1);
        let mut prefix_size = 0;
        while prefix_size <= max_prefix_size {
            if self.get_part(prefix_size) != other.get_part(prefix_size) {
                break;
            }
            prefix_size += 1;
        }
        prefix_size
    }

    /// Compares part by part; a path sorts before the paths it is a prefix of.
    pub fn compare(&self, other: &FieldRef) -> Ordering {
        self.parts().cmp(other.parts())
    }

    /// Whether `component` is an array index as written by a builder: ASCII digits without a
    /// leading zero, or exactly `"0"`.
    pub fn is_numeric_path_component_strict(component: &str) -> bool {
        !(component.len() > 1 && component.starts_with('0'))
            && Self::is_numeric_path_component_lenient(component)
    }

    /// Whether `component` is non-empty and consists only of ASCII digits.
    pub fn is_numeric_path_component_lenient(component: &str) -> bool {
        !component.is_empty() && component.bytes().all(|b| b.is_ascii_digit())
    }

    /// Whether the `i`th part is a strict numeric component.
    pub fn is_numeric_path_component_strict_at(&self, i: usize) -> bool {
        Self::is_numeric_path_component_strict(self.get_part(i))
    }

    pub fn has_numeric_path_components(&self) -> bool {
        self.parts().any(Self::is_numeric_path_component_strict)
    }

    /// The indices, from `start` on, of the parts that are strict numeric components.
    pub fn numeric_path_components(&self, start: usize) -> BTreeSet<usize> {
        self.parts()
            .enumerate()
            .skip(start)
            .filter(|(_, part)| Self::is_numeric_path_component_strict(part))
            .map(|(i, _)| i)
            .collect()
    }
}

impl PartialEq for FieldRef {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for FieldRef {}

impl PartialOrd for FieldRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for FieldRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.num_parts().hash(state);
        for part in self.parts() {
            part.hash(state);
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dotted_field())
    }
}

impl fmt::Debug for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldRef").field(&self.dotted_field()).finish()
    }
}

impl From<&str> for FieldRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl FromStr for FieldRef {
    type Err = Infallible;

    fn from_str(path: &str) -> Result<Self, Infallible> {
        Ok(Self::new(path))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FieldRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.dotted_field())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FieldRef {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let path = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Ok(Self::new(&path))
    }
}
