//! Month and weekday names.

/// Language used for weekday headers and month names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WeekdayLang {
    /// Amharic script.
    #[default]
    Amharic,
    /// English transliteration.
    English,
}

const MONTHS_AMHARIC: [&str; 13] = [
    "መስከረም", "ጥቅምት", "ኅዳር", "ታኅሣሥ", "ጥር", "የካቲት", "መጋቢት", "ሚያዝያ", "ግንቦት", "ሰኔ", "ሐምሌ",
    "ነሐሴ", "ጳጉሜን",
];

const MONTHS_ENGLISH: [&str; 13] = [
    "Meskerem", "Tikimt", "Hidar", "Tahsas", "Tir", "Yekatit", "Megabit", "Miazia", "Ginbot",
    "Sene", "Hamle", "Nehase", "Pagume",
];

const WEEKDAYS_AMHARIC: [&str; 7] = ["እሑድ", "ሰኞ", "ማክሰኞ", "ረቡዕ", "ሐሙስ", "ዓርብ", "ቅዳሜ"];

const WEEKDAYS_ENGLISH: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Returns the name of Ethiopian month `month` (1-13).
pub fn month_name(month: u8, lang: WeekdayLang) -> Option<&'static str> {
    let index = usize::from(month).checked_sub(1)?;
    match lang {
        WeekdayLang::Amharic => MONTHS_AMHARIC.get(index).copied(),
        WeekdayLang::English => MONTHS_ENGLISH.get(index).copied(),
    }
}

/// Returns the name of weekday `weekday`, `0` for Sunday.
pub fn weekday_name(weekday: u8, lang: WeekdayLang) -> &'static str {
    let index = usize::from(weekday % 7);
    match lang {
        WeekdayLang::Amharic => WEEKDAYS_AMHARIC[index],
        WeekdayLang::English => WEEKDAYS_ENGLISH[index],
    }
}

/// Returns the seven weekday names starting from `first`.
pub fn weekday_headers(first: u8, lang: WeekdayLang) -> [&'static str; 7] {
    let mut headers = [""; 7];
    for (offset, slot) in headers.iter_mut().enumerate() {
        *slot = weekday_name(first % 7 + offset as u8, lang);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name() {
        assert_eq!(Some("መስከረም"), month_name(1, WeekdayLang::Amharic));
        assert_eq!(Some("Pagume"), month_name(13, WeekdayLang::English));
        assert_eq!(None, month_name(0, WeekdayLang::English));
        assert_eq!(None, month_name(14, WeekdayLang::Amharic));
    }

    #[test]
    fn test_weekday_headers_rotate() {
        let headers = weekday_headers(1, WeekdayLang::English);
        assert_eq!("Monday", headers[0]);
        assert_eq!("Sunday", headers[6]);
    }
}
