//! Ge'ez numeral formatting.

use crate::error::CalendarError;

const ONES: [&str; 10] = ["", "፩", "፪", "፫", "፬", "፭", "፮", "፯", "፰", "፱"];
const TENS: [&str; 10] = ["", "፲", "፳", "፴", "፵", "፶", "፷", "፸", "፹", "፺"];
const HUNDRED: &str = "፻";
const TEN_THOUSAND: &str = "፼";

/// Renders a positive number in Ge'ez numerals.
///
/// Ge'ez has no zero and no place value: digits pair up into groups of two,
/// joined by ፻ (hundred) and ፼ (ten thousand). A lone ፩ in front of either
/// marker is dropped.
///
/// # Example
///
/// ```
/// use kenat_calendar::to_geez;
///
/// assert_eq!("፳፻፲፮", to_geez(2016).unwrap());
/// assert_eq!("፼", to_geez(10_000).unwrap());
/// ```
pub fn to_geez(value: u32) -> Result<String, CalendarError> {
    if value == 0 {
        return Err(CalendarError::ZeroNumeral);
    }
    let mut out = String::new();
    push_group(&mut out, value);
    Ok(out)
}

fn push_group(out: &mut String, value: u32) {
    let high = value / 10_000;
    let low = value % 10_000;
    if high > 0 {
        if high > 1 {
            push_group(out, high);
        }
        out.push_str(TEN_THOUSAND);
    }
    let hundreds = low / 100;
    if hundreds > 0 {
        if hundreds > 1 {
            push_pair(out, hundreds);
        }
        out.push_str(HUNDRED);
    }
    push_pair(out, low % 100);
}

fn push_pair(out: &mut String, pair: u32) {
    out.push_str(TENS[(pair / 10) as usize]);
    out.push_str(ONES[(pair % 10) as usize]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers() {
        for (expected, value) in [("፩", 1), ("፱", 9), ("፲", 10), ("፲፪", 12), ("፴", 30)] {
            assert_eq!(expected, to_geez(value).unwrap());
        }
    }

    #[test]
    fn test_markers() {
        for (expected, value) in [
            ("፻", 100),
            ("፻፩", 101),
            ("፪፻", 200),
            ("፲፻", 1_000),
            ("፳፻፲፮", 2_016),
            ("፼", 10_000),
            ("፼፻", 10_100),
            ("፻፼", 1_000_000),
            ("፻፩፼", 1_010_000),
            ("፼፼", 100_000_000),
        ] {
            assert_eq!(expected, to_geez(value).unwrap(), "{value}");
        }
    }

    #[test]
    fn test_zero_is_rejected() {
        assert_eq!(Err(CalendarError::ZeroNumeral), to_geez(0));
    }
}
