//! Daily horoscope readings
//!
//! Domain types for a single day's reading and the provider seam the state
//! layer fetches through whenever the committed date changes.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Simulated network latency of the sample provider
pub const SAMPLE_LATENCY: Duration = Duration::from_millis(800);

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while fetching a reading
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HoroscopeError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// The response could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No birth data has been entered yet
    #[error("Birth data is required to compute a reading")]
    MissingBirthData,
}

impl HoroscopeError {
    /// Whether retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, HoroscopeError::Network(_))
    }
}

/// Result type for horoscope operations
pub type Result<T> = std::result::Result<T, HoroscopeError>;

// =============================================================================
// Birth Data
// =============================================================================

/// Birth moment and place used to cast the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthData {
    /// Year
    pub year: i32,
    /// Month (1-12)
    pub month: u32,
    /// Day of month
    pub day: u32,
    /// Hour (0-23)
    pub hour: u32,
    /// Minute
    pub minute: u32,
    /// Second, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<u32>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// UTC offset in hours
    pub timezone: f64,
}

impl BirthData {
    /// Check that the calendar fields name a real moment and the
    /// coordinates lie on the globe
    pub fn validate(&self) -> Result<()> {
        let moment = chrono::NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_opt(self.hour, self.minute, self.second.unwrap_or(0)));
        if moment.is_none() {
            return Err(HoroscopeError::InvalidResponse(format!(
                "birth date {}-{:02}-{:02} {:02}:{:02} does not exist",
                self.year, self.month, self.day, self.hour, self.minute
            )));
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(HoroscopeError::InvalidResponse(format!(
                "coordinates ({}, {}) are out of range",
                self.latitude, self.longitude
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Reading
// =============================================================================

/// Direction a dimension is heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Improving
    Up,
    /// Declining
    Down,
    /// Unchanged
    Stable,
}

/// Score for one life dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    /// Dimension name ("Love", "Career", ...)
    pub category: String,
    /// Score in 0-100
    pub score: u8,
    /// Trend against the previous period
    pub trend: TrendDirection,
    /// Short descriptive label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Whether a guidance item is advice to follow or to avoid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceKind {
    /// Recommended
    Do,
    /// Discouraged
    Dont,
}

/// A single do/don't item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceItem {
    /// Stable identifier
    pub id: String,
    /// Do or don't
    #[serde(rename = "type")]
    pub kind: GuidanceKind,
    /// Headline keyword
    pub keyword: String,
    /// Icon name
    pub icon: String,
    /// Explanation revealed on tap
    pub reason: String,
}

/// Kind of planetary event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitKind {
    /// Apparent backward motion
    Retrograde,
    /// Entry into a sign
    Ingress,
    /// Angle between two bodies
    Aspect,
}

/// A transit affecting the reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitEvent {
    /// Stable identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Event kind
    #[serde(rename = "type")]
    pub kind: TransitKind,
    /// Primary planet
    pub planet: String,
    /// Sign involved, for ingresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    /// Degree, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    /// Brief description for the ticker
    pub description: String,
    /// Personal impact
    pub impact: String,
    /// Start of the event window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<NaiveDateTime>,
    /// End of the event window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    /// Intensity in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
}

/// Long-form interpretation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AiAnalysis {
    /// Overall outlook
    pub general: String,
    /// Relationships
    pub love: String,
    /// Work
    pub career: String,
}

/// A complete reading for one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyHoroscope {
    /// Date the reading is for
    pub date: NaiveDateTime,
    /// Sun sign
    pub sign: String,
    /// One-line headline
    pub headline: String,
    /// Overall score in 0-100
    pub overall_score: u8,
    /// Per-dimension scores
    pub dimensions: Vec<DimensionScore>,
    /// Do/don't guidance
    pub guidance: Vec<GuidanceItem>,
    /// Active transits
    pub transits: Vec<TransitEvent>,
    /// Long-form interpretation
    pub ai_analysis: AiAnalysis,
}

impl DailyHoroscope {
    /// Look up a dimension by category name
    pub fn dimension(&self, category: &str) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.category.eq_ignore_ascii_case(category))
    }

    /// Guidance items of one kind
    pub fn guidance_of(&self, kind: GuidanceKind) -> impl Iterator<Item = &GuidanceItem> {
        self.guidance.iter().filter(move |g| g.kind == kind)
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Source of daily readings
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HoroscopeProvider: Send + Sync {
    /// Fetch the reading for `date` cast from `birth`
    async fn daily_horoscope(&self, birth: &BirthData, date: NaiveDateTime) -> Result<DailyHoroscope>;
}

/// Provider returning a fixed sample reading
///
/// Useful for previews and tests. Every reading carries the requested
/// date so consumers can tell responses apart.
#[derive(Debug, Clone, Default)]
pub struct SampleHoroscopeProvider {
    delay: Option<Duration>,
}

impl SampleHoroscopeProvider {
    /// Create a provider that answers immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer after `delay`, simulating network latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The sample reading for `date`
    pub fn sample(date: NaiveDateTime) -> DailyHoroscope {
        fn dimension(category: &str, score: u8, trend: TrendDirection, label: &str) -> DimensionScore {
            DimensionScore {
                category: category.to_string(),
                score,
                trend,
                label: Some(label.to_string()),
            }
        }

        DailyHoroscope {
            date,
            sign: "Scorpio".to_string(),
            headline: "Chaos is a ladder.".to_string(),
            overall_score: 84,
            dimensions: vec![
                dimension("Love", 92, TrendDirection::Up, "Passionate"),
                dimension("Career", 65, TrendDirection::Stable, "Steady"),
                dimension("Intellect", 88, TrendDirection::Up, "Sharp"),
                dimension("Health", 70, TrendDirection::Down, "Rest Needed"),
                dimension("Social", 45, TrendDirection::Stable, "Selective"),
            ],
            guidance: vec![
                GuidanceItem {
                    id: "1".to_string(),
                    kind: GuidanceKind::Do,
                    keyword: "Meditation".to_string(),
                    icon: "Lotus".to_string(),
                    reason: "Your mind is racing; find stillness to clarify your vision.".to_string(),
                },
                GuidanceItem {
                    id: "2".to_string(),
                    kind: GuidanceKind::Dont,
                    keyword: "Impulse".to_string(),
                    icon: "Zap".to_string(),
                    reason: "Mars is squaring your Mercury. Think twice before you speak.".to_string(),
                },
            ],
            transits: vec![
                TransitEvent {
                    id: "t1".to_string(),
                    title: "Mercury Retrograde".to_string(),
                    kind: TransitKind::Retrograde,
                    planet: "Mercury".to_string(),
                    sign: None,
                    degree: None,
                    description: "Communication glitches expected.".to_string(),
                    impact: "Revisit old projects, but delay signing new contracts.".to_string(),
                    start_time: None,
                    end_time: None,
                    intensity: None,
                },
                TransitEvent {
                    id: "t2".to_string(),
                    title: "Moon in Scorpio".to_string(),
                    kind: TransitKind::Ingress,
                    planet: "Moon".to_string(),
                    sign: Some("Scorpio".to_string()),
                    degree: None,
                    description: "Emotional intensity peaks.".to_string(),
                    impact: "You feel everything deeply today.".to_string(),
                    start_time: None,
                    end_time: None,
                    intensity: None,
                },
            ],
            ai_analysis: AiAnalysis {
                general: "The alignment of the stars suggests a time of introspection.".to_string(),
                love: "Venus trine Mars creates a harmonious flow between desire and action."
                    .to_string(),
                career: "Expect clear communication, but watch for misunderstandings with authority."
                    .to_string(),
            },
        }
    }
}

#[async_trait]
impl HoroscopeProvider for SampleHoroscopeProvider {
    async fn daily_horoscope(&self, birth: &BirthData, date: NaiveDateTime) -> Result<DailyHoroscope> {
        birth.validate()?;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        tracing::debug!(%date, "Serving sample horoscope");
        Ok(Self::sample(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn birth() -> BirthData {
        BirthData {
            year: 1994,
            month: 11,
            day: 7,
            hour: 6,
            minute: 30,
            second: None,
            latitude: 31.23,
            longitude: 121.47,
            timezone: 8.0,
        }
    }

    fn date(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    // ==========================================================================
    // Domain Tests
    // ==========================================================================

    #[test]
    fn test_error_retryable() {
        assert!(HoroscopeError::Network("timeout".into()).is_retryable());
        assert!(!HoroscopeError::InvalidResponse("bad json".into()).is_retryable());
        assert!(!HoroscopeError::MissingBirthData.is_retryable());
    }

    #[test]
    fn test_birth_data_validation() {
        assert!(birth().validate().is_ok());

        let mut bad_date = birth();
        bad_date.month = 2;
        bad_date.day = 30;
        assert!(bad_date.validate().is_err());

        let mut bad_place = birth();
        bad_place.latitude = 95.0;
        assert!(bad_place.validate().is_err());
    }

    #[test]
    fn test_sample_reading_contents() {
        let reading = SampleHoroscopeProvider::sample(date(10));
        assert_eq!(reading.overall_score, 84);
        assert_eq!(reading.dimensions.len(), 5);
        assert_eq!(reading.dimension("love").map(|d| d.score), Some(92));
        assert_eq!(reading.dimension("Health").map(|d| d.trend), Some(TrendDirection::Down));
        assert_eq!(reading.guidance_of(GuidanceKind::Dont).count(), 1);
        assert!(reading.dimension("Wealth").is_none());
    }

    #[test]
    fn test_reading_json_shape() {
        let reading = SampleHoroscopeProvider::sample(date(10));
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["overallScore"], 84);
        assert_eq!(json["guidance"][0]["type"], "do");
        assert_eq!(json["transits"][0]["type"], "retrograde");
        assert_eq!(json["dimensions"][3]["trend"], "down");
        assert!(json["transits"][0].get("sign").is_none());

        let back: DailyHoroscope = serde_json::from_value(json).unwrap();
        assert_eq!(back, reading);
    }

    // ==========================================================================
    // Provider Tests
    // ==========================================================================

    #[tokio::test]
    async fn test_sample_provider_echoes_date() {
        let provider = SampleHoroscopeProvider::new();
        let reading = provider.daily_horoscope(&birth(), date(12)).await.unwrap();
        assert_eq!(reading.date, date(12));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sample_provider_delay() {
        let provider = SampleHoroscopeProvider::new().with_delay(SAMPLE_LATENCY);
        let started = tokio::time::Instant::now();
        provider.daily_horoscope(&birth(), date(12)).await.unwrap();
        assert!(started.elapsed() >= SAMPLE_LATENCY);
    }

    #[tokio::test]
    async fn test_sample_provider_rejects_invalid_birth() {
        let mut invalid = birth();
        invalid.hour = 25;
        let result = SampleHoroscopeProvider::new().daily_horoscope(&invalid, date(12)).await;
        assert!(matches!(result, Err(HoroscopeError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut mock = MockHoroscopeProvider::new();
        mock.expect_daily_horoscope()
            .times(1)
            .returning(|_, _| Err(HoroscopeError::Network("offline".into())));

        let result = mock.daily_horoscope(&birth(), date(12)).await;
        assert_eq!(result, Err(HoroscopeError::Network("offline".into())));
    }
}
