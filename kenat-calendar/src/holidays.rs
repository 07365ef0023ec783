//! Ethiopian public, religious and cultural holidays.
//!
//! Fixed holidays sit on an Ethiopian (or, for Labour Day, Gregorian) date.
//! Christian movable feasts follow the Julian computus; Muslim feasts use
//! the tabular Hijri calendar, so they may differ from the announced date by
//! a day.

use crate::{
    date::{EthiopianDate, GregorianDate, SUPPORTED_YEARS},
    error::CalendarError,
    names::WeekdayLang,
};

/// Category a holiday belongs to. A holiday may carry several tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HolidayTag {
    /// Nationwide day off.
    Public,
    /// Religious observance.
    Religious,
    /// Ethiopian Orthodox Christian feast.
    Christian,
    /// Muslim feast.
    Muslim,
    /// Commemoration of a state event.
    State,
    /// Cultural celebration.
    Cultural,
}

impl HolidayTag {
    fn bit(self) -> u8 {
        match self {
            HolidayTag::Public => 1,
            HolidayTag::Religious => 1 << 1,
            HolidayTag::Christian => 1 << 2,
            HolidayTag::Muslim => 1 << 3,
            HolidayTag::State => 1 << 4,
            HolidayTag::Cultural => 1 << 5,
        }
    }
}

/// A set of tags; a holiday passes when it carries at least one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HolidayFilter {
    bits: u8,
}

impl HolidayFilter {
    /// Creates a filter that matches nothing.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Adds a tag to the set.
    pub fn with(mut self, tag: HolidayTag) -> Self {
        self.bits |= tag.bit();
        self
    }

    /// Returns true when the tag is part of the set.
    pub fn contains(&self, tag: HolidayTag) -> bool {
        self.bits & tag.bit() != 0
    }

    /// Returns true when the holiday carries any tag of the set.
    pub fn matches(&self, holiday: &Holiday) -> bool {
        holiday.tags().iter().any(|tag| self.contains(*tag))
    }
}

impl FromIterator<HolidayTag> for HolidayFilter {
    fn from_iter<I: IntoIterator<Item = HolidayTag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// Identifies a holiday independent of the year it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HolidayKey {
    /// Ethiopian New Year, 1 Meskerem.
    Enkutatash,
    /// Finding of the True Cross, 17 Meskerem.
    Meskel,
    /// Christmas.
    Genna,
    /// Epiphany, 11 Tir.
    Timket,
    /// Victory of Adwa, 23 Yekatit.
    Adwa,
    /// International Labour Day, 1 May.
    LabourDay,
    /// Patriots' Victory Day, 27 Miazia.
    Patriots,
    /// Downfall of the Derg, 20 Ginbot.
    DergDownfall,
    /// Palm Sunday, a week before Fasika.
    Hosanna,
    /// Good Friday.
    Siklet,
    /// Easter.
    Fasika,
    /// Birth of the Prophet, 12 Rabi' al-awwal.
    Mawlid,
    /// End of Ramadan, 1 Shawwal.
    EidAlFitr,
    /// Feast of Sacrifice, 10 Dhu al-Hijjah.
    EidAlAdha,
}

impl HolidayKey {
    /// Returns the tags of the holiday, most general first.
    pub fn tags(self) -> &'static [HolidayTag] {
        use HolidayTag::*;
        match self {
            HolidayKey::Enkutatash => &[Public, Cultural],
            HolidayKey::Meskel
            | HolidayKey::Genna
            | HolidayKey::Timket
            | HolidayKey::Siklet
            | HolidayKey::Fasika => &[Public, Religious, Christian],
            HolidayKey::Hosanna => &[Religious, Christian],
            HolidayKey::Adwa
            | HolidayKey::LabourDay
            | HolidayKey::Patriots
            | HolidayKey::DergDownfall => &[Public, State],
            HolidayKey::Mawlid | HolidayKey::EidAlFitr | HolidayKey::EidAlAdha => {
                &[Public, Religious, Muslim]
            }
        }
    }

    /// Returns the display name.
    pub fn name(self, lang: WeekdayLang) -> &'static str {
        match (self, lang) {
            (HolidayKey::Enkutatash, WeekdayLang::Amharic) => "እንቁጣጣሽ",
            (HolidayKey::Enkutatash, WeekdayLang::English) => "Ethiopian New Year",
            (HolidayKey::Meskel, WeekdayLang::Amharic) => "መስቀል",
            (HolidayKey::Meskel, WeekdayLang::English) => "Finding of the True Cross",
            (HolidayKey::Genna, WeekdayLang::Amharic) => "ገና",
            (HolidayKey::Genna, WeekdayLang::English) => "Ethiopian Christmas",
            (HolidayKey::Timket, WeekdayLang::Amharic) => "ጥምቀት",
            (HolidayKey::Timket, WeekdayLang::English) => "Epiphany",
            (HolidayKey::Adwa, WeekdayLang::Amharic) => "የአድዋ ድል በዓል",
            (HolidayKey::Adwa, WeekdayLang::English) => "Victory of Adwa",
            (HolidayKey::LabourDay, WeekdayLang::Amharic) => "የሰራተኞች ቀን",
            (HolidayKey::LabourDay, WeekdayLang::English) => "International Labour Day",
            (HolidayKey::Patriots, WeekdayLang::Amharic) => "የአርበኞች ቀን",
            (HolidayKey::Patriots, WeekdayLang::English) => "Patriots' Victory Day",
            (HolidayKey::DergDownfall, WeekdayLang::Amharic) => "ደርግ የወደቀበት ቀን",
            (HolidayKey::DergDownfall, WeekdayLang::English) => "Downfall of the Derg",
            (HolidayKey::Hosanna, WeekdayLang::Amharic) => "ሆሳዕና",
            (HolidayKey::Hosanna, WeekdayLang::English) => "Palm Sunday",
            (HolidayKey::Siklet, WeekdayLang::Amharic) => "ስቅለት",
            (HolidayKey::Siklet, WeekdayLang::English) => "Good Friday",
            (HolidayKey::Fasika, WeekdayLang::Amharic) => "ፋሲካ",
            (HolidayKey::Fasika, WeekdayLang::English) => "Easter",
            (HolidayKey::Mawlid, WeekdayLang::Amharic) => "መውሊድ",
            (HolidayKey::Mawlid, WeekdayLang::English) => "Birth of the Prophet",
            (HolidayKey::EidAlFitr, WeekdayLang::Amharic) => "ኢድ አል ፈጥር",
            (HolidayKey::EidAlFitr, WeekdayLang::English) => "Eid al-Fitr",
            (HolidayKey::EidAlAdha, WeekdayLang::Amharic) => "ኢድ አል አድሃ",
            (HolidayKey::EidAlAdha, WeekdayLang::English) => "Eid al-Adha",
        }
    }

    /// Returns a one-sentence description for detail views.
    pub fn description(self, lang: WeekdayLang) -> &'static str {
        match (self, lang) {
            (HolidayKey::Enkutatash, WeekdayLang::Amharic) => "የኢትዮጵያ አዲስ ዓመት መባቻ፣ መስከረም 1።",
            (HolidayKey::Enkutatash, WeekdayLang::English) => {
                "The first day of Meskerem, which opens the Ethiopian year."
            }
            (HolidayKey::Meskel, WeekdayLang::Amharic) => "የእውነተኛው መስቀል መገኘት በደመራ የሚከበርበት በዓል።",
            (HolidayKey::Meskel, WeekdayLang::English) => {
                "Commemorates the finding of the True Cross, celebrated with the Demera bonfire."
            }
            (HolidayKey::Genna, WeekdayLang::Amharic) => "የኢየሱስ ክርስቶስ ልደት በዓል።",
            (HolidayKey::Genna, WeekdayLang::English) => "The Orthodox celebration of the birth of Christ.",
            (HolidayKey::Timket, WeekdayLang::Amharic) => "የኢየሱስ ክርስቶስ ጥምቀት በዓል።",
            (HolidayKey::Timket, WeekdayLang::English) => {
                "Celebrates the baptism of Christ in the Jordan river."
            }
            (HolidayKey::Adwa, WeekdayLang::Amharic) => "በ1888 ዓ.ም. በአድዋ ጦርነት የተገኘው ድል መታሰቢያ።",
            (HolidayKey::Adwa, WeekdayLang::English) => {
                "Marks the 1896 victory over the Italian army at the Battle of Adwa."
            }
            (HolidayKey::LabourDay, WeekdayLang::Amharic) => "የዓለም አቀፍ የሰራተኞች ቀን።",
            (HolidayKey::LabourDay, WeekdayLang::English) => "International Workers' Day, held on 1 May.",
            (HolidayKey::Patriots, WeekdayLang::Amharic) => "በ1933 ዓ.ም. የአርበኞች ድልና የአዲስ አበባ ነፃነት መታሰቢያ።",
            (HolidayKey::Patriots, WeekdayLang::English) => {
                "Marks the 1941 return of Addis Ababa and the end of the Italian occupation."
            }
            (HolidayKey::DergDownfall, WeekdayLang::Amharic) => "በ1983 ዓ.ም. የደርግ መንግሥት የወደቀበት ቀን።",
            (HolidayKey::DergDownfall, WeekdayLang::English) => {
                "Marks the fall of the Derg military government in 1991."
            }
            (HolidayKey::Hosanna, WeekdayLang::Amharic) => "ኢየሱስ ክርስቶስ ወደ ኢየሩሳሌም የገባበት መታሰቢያ።",
            (HolidayKey::Hosanna, WeekdayLang::English) => {
                "Commemorates the entry of Christ into Jerusalem, one week before Fasika."
            }
            (HolidayKey::Siklet, WeekdayLang::Amharic) => "የኢየሱስ ክርስቶስ ስቅለት መታሰቢያ።",
            (HolidayKey::Siklet, WeekdayLang::English) => "Commemorates the crucifixion of Christ.",
            (HolidayKey::Fasika, WeekdayLang::Amharic) => "የኢየሱስ ክርስቶስ ትንሣኤ በዓል፣ የሁዳዴ ጾም ፍጻሜ።",
            (HolidayKey::Fasika, WeekdayLang::English) => {
                "Celebrates the resurrection of Christ and ends the fifty-five day Lenten fast."
            }
            (HolidayKey::Mawlid, WeekdayLang::Amharic) => "የነቢዩ መሐመድ ልደት በዓል።",
            (HolidayKey::Mawlid, WeekdayLang::English) => "Celebrates the birth of the Prophet Muhammad.",
            (HolidayKey::EidAlFitr, WeekdayLang::Amharic) => "የረመዳን ጾም ፍጻሜ በዓል።",
            (HolidayKey::EidAlFitr, WeekdayLang::English) => "Marks the end of the Ramadan fast.",
            (HolidayKey::EidAlAdha, WeekdayLang::Amharic) => "የአረፋ በዓል፣ የሐጅ ወቅት መደምደሚያ።",
            (HolidayKey::EidAlAdha, WeekdayLang::English) => {
                "The Feast of Sacrifice, held at the close of the Hajj."
            }
        }
    }
}

/// A holiday occurrence in a particular year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Holiday {
    /// Which holiday this is.
    pub key: HolidayKey,
    /// Date on the Ethiopian calendar.
    pub ethiopian: EthiopianDate,
    /// Date on the Gregorian calendar.
    pub gregorian: GregorianDate,
}

impl Holiday {
    /// Returns the display name.
    pub fn name(&self, lang: WeekdayLang) -> &'static str {
        self.key.name(lang)
    }

    /// Returns the description.
    pub fn description(&self, lang: WeekdayLang) -> &'static str {
        self.key.description(lang)
    }

    /// Returns the holiday's tags.
    pub fn tags(&self) -> &'static [HolidayTag] {
        self.key.tags()
    }

    fn from_jdn(key: HolidayKey, jdn: i64) -> Result<Self, CalendarError> {
        Ok(Self {
            key,
            ethiopian: EthiopianDate::from_jdn(jdn)?,
            gregorian: GregorianDate::from_jdn(jdn)?,
        })
    }
}

/// Returns every holiday of Ethiopian `year` that passes `filter`, ordered
/// by date.
pub fn holidays_in_year(
    year: i32,
    filter: Option<&HolidayFilter>,
) -> Result<Vec<Holiday>, CalendarError> {
    let start = EthiopianDate::new(year, 1, 1).to_jdn()?;
    let length = if EthiopianDate::is_leap_year(year) { 366 } else { 365 };
    let end = start + length - 1;

    let mut jdns = Vec::with_capacity(16);
    let fixed = [
        (HolidayKey::Enkutatash, 1, 1),
        (HolidayKey::Meskel, 1, 17),
        (HolidayKey::Genna, 4, genna_day(year)),
        (HolidayKey::Timket, 5, 11),
        (HolidayKey::Adwa, 6, 23),
        (HolidayKey::Patriots, 8, 27),
        (HolidayKey::DergDownfall, 9, 20),
    ];
    for (key, month, day) in fixed {
        jdns.push((key, EthiopianDate::new(year, month, day).to_jdn()?));
    }

    // Ethiopian year N runs from September of Gregorian year N + 7 into N + 8.
    let gregorian_year = year + 8;
    if SUPPORTED_YEARS.contains(&gregorian_year) {
        jdns.push((
            HolidayKey::LabourDay,
            GregorianDate::new(gregorian_year, 5, 1).to_jdn()?,
        ));
    }
    let easter = orthodox_easter_jdn(gregorian_year as i64);
    jdns.push((HolidayKey::Hosanna, easter - 7));
    jdns.push((HolidayKey::Siklet, easter - 2));
    jdns.push((HolidayKey::Fasika, easter));

    for hijri_year in hijri_year_of(start) - 1..=hijri_year_of(end) + 1 {
        for (key, month, day) in [
            (HolidayKey::Mawlid, 3, 12),
            (HolidayKey::EidAlFitr, 10, 1),
            (HolidayKey::EidAlAdha, 12, 10),
        ] {
            jdns.push((key, hijri_to_jdn(hijri_year, month, day)));
        }
    }

    let mut holidays = jdns
        .into_iter()
        .filter(|(_, jdn)| (start..=end).contains(jdn))
        .map(|(key, jdn)| Holiday::from_jdn(key, jdn))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(filter) = filter {
        holidays.retain(|holiday| filter.matches(holiday));
    }
    holidays.sort_by_key(|holiday| (holiday.ethiopian, holiday.key));
    Ok(holidays)
}

/// Returns the holidays falling in one Ethiopian month, ordered by day.
pub fn holidays_in_month(
    year: i32,
    month: u8,
    filter: Option<&HolidayFilter>,
) -> Result<Vec<Holiday>, CalendarError> {
    if !(1..=13).contains(&month) {
        return Err(CalendarError::InvalidMonth(month));
    }
    let mut holidays = holidays_in_year(year, filter)?;
    holidays.retain(|holiday| holiday.ethiopian.month == month);
    Ok(holidays)
}

/// Genna is 29 Tahsas, pulled to the 28th after a six-day Pagumē.
fn genna_day(year: i32) -> u8 {
    if EthiopianDate::is_leap_year(year - 1) {
        28
    } else {
        29
    }
}

/// Easter of the Ethiopian Orthodox church for a Gregorian year.
fn orthodox_easter_jdn(year: i64) -> i64 {
    let a = year % 4;
    let b = year % 7;
    let c = year % 19;
    let d = (19 * c + 15) % 30;
    let e = (2 * a + 4 * b - d + 34) % 7;
    let month = (d + e + 114) / 31;
    let day = (d + e + 114) % 31 + 1;
    julian_to_jdn(year, month, day)
}

fn julian_to_jdn(year: i64, month: i64, day: i64) -> i64 {
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y / 4 - 32_083
}

const HIJRI_EPOCH: i64 = 1_948_440;

fn hijri_to_jdn(year: i64, month: i64, day: i64) -> i64 {
    (11 * year + 3) / 30 + 354 * year + 30 * month - (month - 1) / 2 + day + HIJRI_EPOCH - 385
}

fn hijri_year_of(jdn: i64) -> i64 {
    ((jdn - HIJRI_EPOCH) * 30 + 10_646).div_euclid(10_631)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(holidays: &[Holiday], key: HolidayKey) -> Option<Holiday> {
        holidays.iter().copied().find(|holiday| holiday.key == key)
    }

    #[test]
    fn test_fixed_holidays_2016() {
        let holidays = holidays_in_year(2016, None).unwrap();
        let meskel = find(&holidays, HolidayKey::Meskel).unwrap();
        assert_eq!(GregorianDate::new(2023, 9, 28), meskel.gregorian);
        let genna = find(&holidays, HolidayKey::Genna).unwrap();
        assert_eq!(GregorianDate::new(2024, 1, 7), genna.gregorian);
        assert_eq!(EthiopianDate::new(2016, 4, 28), genna.ethiopian);
        let adwa = find(&holidays, HolidayKey::Adwa).unwrap();
        assert_eq!(GregorianDate::new(2024, 3, 2), adwa.gregorian);
    }

    #[test]
    fn test_movable_holidays_2016() {
        let holidays = holidays_in_year(2016, None).unwrap();
        let fasika = find(&holidays, HolidayKey::Fasika).unwrap();
        assert_eq!(GregorianDate::new(2024, 5, 5), fasika.gregorian);
        let siklet = find(&holidays, HolidayKey::Siklet).unwrap();
        assert_eq!(GregorianDate::new(2024, 5, 3), siklet.gregorian);
        let eid = find(&holidays, HolidayKey::EidAlFitr).unwrap();
        assert_eq!(GregorianDate::new(2024, 4, 10), eid.gregorian);
    }

    #[test]
    fn test_sorted_by_date() {
        let holidays = holidays_in_year(2016, None).unwrap();
        assert!(
            holidays
                .windows(2)
                .all(|pair| pair[0].ethiopian <= pair[1].ethiopian)
        );
        assert_eq!(HolidayKey::Enkutatash, holidays[0].key);
    }

    #[test]
    fn test_filter_by_tag() {
        let filter: HolidayFilter = [HolidayTag::Muslim].into_iter().collect();
        let holidays = holidays_in_year(2016, Some(&filter)).unwrap();
        assert!(!holidays.is_empty());
        assert!(
            holidays
                .iter()
                .all(|holiday| holiday.tags().contains(&HolidayTag::Muslim))
        );
    }

    #[test]
    fn test_every_holiday_has_descriptions() {
        let holidays = holidays_in_year(2016, None).unwrap();
        assert!(!holidays.is_empty());
        for holiday in &holidays {
            for lang in [WeekdayLang::Amharic, WeekdayLang::English] {
                let description = holiday.description(lang);
                assert!(!description.is_empty());
                assert_ne!(holiday.name(lang), description);
            }
        }
        let adwa = find(&holidays, HolidayKey::Adwa).unwrap();
        assert!(adwa.description(WeekdayLang::English).contains("Adwa"));
    }

    #[test]
    fn test_holidays_in_month() {
        let holidays = holidays_in_month(2016, 1, None).unwrap();
        let keys: Vec<_> = holidays.iter().map(|holiday| holiday.key).collect();
        assert!(keys.starts_with(&[HolidayKey::Enkutatash]));
        assert!(keys.contains(&HolidayKey::Meskel));
        assert_eq!(
            Err(CalendarError::InvalidMonth(14)),
            holidays_in_month(2016, 14, None)
        );
    }
}
