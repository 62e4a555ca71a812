use std::cmp::Ordering;

/// Sort class of a line. Lines starting with an ASCII digit come first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum SortClass {
    /// The first character is an ASCII digit
    Numeric,
    /// Anything else, including the empty line
    Text,
}

/// The natural sort key of a single line.
///
/// The key orders lines by
/// * class, digit leading lines first
/// * the leading integer of digit leading lines
/// * the complete line text
///
/// The leading integer is the maximal run of ASCII digits at the start of the line, so "12a apple"
/// has the integer 12 and "3.5x note" has the integer 3. Integers are compared by magnitude
/// directly on their digits and never overflow.
///
/// # Examples
/// ```
/// use natural_file_sort::natural_key::NaturalKey;
///
/// assert!(NaturalKey::new("2 apple") < NaturalKey::new("10 banana"));
/// assert!(NaturalKey::new("10 banana") < NaturalKey::new("apple"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct NaturalKey<'a> {
    class: SortClass,
    digits: &'a str,
    text: &'a str,
}

impl<'a> NaturalKey<'a> {
    /// Derive the key of `line`. The key borrows from the line.
    pub fn new(line: &'a str) -> NaturalKey<'a> {
        let run = line.bytes().take_while(|b| b.is_ascii_digit()).count();
        if run == 0 {
            NaturalKey {
                class: SortClass::Text,
                digits: "",
                text: line,
            }
        } else {
            NaturalKey {
                class: SortClass::Numeric,
                digits: line[..run].trim_start_matches('0'),
                text: line,
            }
        }
    }

    pub fn class(&self) -> SortClass {
        self.class
    }

    /// Significant digits of the leading integer, without leading zeros. Empty for zero and for
    /// [SortClass::Text] lines.
    pub fn digits(&self) -> &'a str {
        self.digits
    }

    /// The leading integer, if the line is digit leading and the value fits into u64.
    pub fn integer(&self) -> Option<u64> {
        match self.class {
            SortClass::Numeric if self.digits.is_empty() => Some(0),
            SortClass::Numeric => self.digits.parse::<u64>().ok(),
            SortClass::Text => None,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }
}

impl Eq for NaturalKey<'_> {}

impl PartialEq<Self> for NaturalKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd<Self> for NaturalKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NaturalKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.class.cmp(&other.class)
            .then_with(|| self.digits.len().cmp(&other.digits.len()))
            .then_with(|| self.digits.cmp(other.digits))
            .then_with(|| self.text.cmp(other.text))
    }
}

/// Compare two lines in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}
