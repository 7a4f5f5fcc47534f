//! Event Brief Engine
//!
//! Fuses the host knowledge base with live founder signal and composes a short,
//! ordered list of talking points for an event.
//!
//! Point order is fixed: host context, ice breaker, domain patterns (or the
//! honest fallback), opening questions, live break, posture. Posture is always last.

use crate::config::{BriefConfig, FetchPolicy};
use crate::domain::{self, Domain, TopicMatcher};
use crate::hosts::{self, HostEntry, HostProfile, DEFAULT_POSTURE, DEFAULT_QUESTIONS};
use crate::signals::SignalSource;
use crate::types::*;
use anyhow::{Context, Result};
use serde::Serialize;
use std::future::Future;

/// The only point returned when live signal cannot be fetched
pub const DATA_UNAVAILABLE: &str =
    "Precognition data unavailable — check your connection to the intelligence backend.";

/// Inflections kept after filtering
const MAX_INFLECTIONS: usize = 3;
/// Score that makes any inflection worth mentioning
const INFLECTION_SCORE_BAR: f64 = 20.0;
/// Event types that always pass the inflection filter
const NOTABLE_EVENT_TYPES: [&str; 3] = ["score_threshold", "commit_spike", "star_spike"];
/// Themes shown when falling back to generic signal
const DISPLAY_THEME_COUNT: usize = 3;
/// Minimum filtered themes before the domain view replaces the global ranking
const MIN_DOMAIN_VIEW: usize = 2;
/// Founders a topic theme needs to count as real signal
const MIN_TOPIC_BUILDERS: u32 = 6;

/// Raw feeds from one fetch round
#[derive(Debug, Clone, Default)]
pub struct SignalSnapshot {
    pub themes: Vec<Theme>,
    pub emergence: EmergenceFeed,
    pub stats: serde_json::Value,
}

/// Everything the composer decided, kept for inspection and JSON output
#[derive(Debug, Clone, Serialize)]
pub struct BriefSignals {
    pub domain: Domain,
    pub display_themes: Vec<Theme>,
    pub relevant_themes: Vec<Theme>,
    pub hot_sector: Option<SectorHeat>,
    pub recent_break: Option<InflectionEvent>,
    pub signal_positive: bool,
    pub host_resolved: bool,
}

/// A brief together with the analysis behind it
#[derive(Debug, Clone, Serialize)]
pub struct BriefReport {
    pub brief: Brief,
    pub signals: BriefSignals,
}

/// Generates event briefs from a signal source
pub struct BriefEngine<'a, S> {
    source: S,
    config: BriefConfig,
    hosts: &'a [HostEntry],
}

impl<S: SignalSource> BriefEngine<'static, S> {
    /// Engine over the built-in host table
    pub fn new(source: S, config: BriefConfig) -> Self {
        Self {
            source,
            config,
            hosts: hosts::profiles(),
        }
    }
}

impl<'a, S: SignalSource> BriefEngine<'a, S> {
    /// Engine over a caller-supplied host table
    pub fn with_hosts(source: S, config: BriefConfig, hosts: &'a [HostEntry]) -> Self {
        Self {
            source,
            config,
            hosts,
        }
    }

    pub fn config(&self) -> &BriefConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Generate the talking points for an event.
    ///
    /// Never fails: a fetch failure yields `[DATA_UNAVAILABLE]`.
    pub async fn generate_brief(&self, event_name: &str, host: Option<&str>) -> Vec<String> {
        match self.report(event_name, host).await {
            Ok(report) => report.brief.points,
            Err(e) => {
                tracing::warn!("Brief for {:?} unavailable: {:#}", event_name, e);
                vec![DATA_UNAVAILABLE.to_string()]
            }
        }
    }

    /// Generate a brief plus the analysis behind it. Errors only on fetch failure.
    pub async fn report(&self, event_name: &str, host: Option<&str>) -> Result<BriefReport> {
        // 1. Pull all three feeds concurrently
        let snapshot = self.fetch_signals().await?;

        // 2-6. Filter, rank and resolve the host
        let profile = hosts::resolve_in(self.hosts, host);
        let signals = analyze(&snapshot, host, profile, self.config.min_domain_signal);

        tracing::info!(
            event_name,
            domain = signals.domain.name(),
            host_resolved = signals.host_resolved,
            signal_positive = signals.signal_positive,
            "Composing brief"
        );

        // 7. Compose in fixed order
        let points = compose_points(&signals, profile);

        // 8. Optional cap, posture stays last
        let points = apply_cap(points, self.config.max_points);

        Ok(BriefReport {
            brief: Brief::new(event_name, host, points),
            signals,
        })
    }

    /// Fetch themes, emergence and stats concurrently under the fetch policy
    pub async fn fetch_signals(&self) -> Result<SignalSnapshot> {
        let themes = self.timed("themes", self.source.themes());
        let emergence = self.timed("emergence", self.source.emergence());
        let stats = self.timed("stats", self.source.stats());

        match self.config.fetch_policy {
            FetchPolicy::AbortOnAnyFailure => {
                // First failure cancels the feeds still in flight
                let (themes, emergence, stats) = tokio::try_join!(themes, emergence, stats)?;
                let snapshot = SignalSnapshot {
                    themes,
                    emergence,
                    stats,
                };
                log_snapshot(&snapshot);
                Ok(snapshot)
            }
            FetchPolicy::BestEffort => {
                let (themes, emergence, stats) = tokio::join!(themes, emergence, stats);
                if let (Err(e), Err(_), Err(_)) = (&themes, &emergence, &stats) {
                    return Err(anyhow::anyhow!("All signal feeds failed: {:#}", e));
                }
                let snapshot = SignalSnapshot {
                    themes: or_empty("themes", themes),
                    emergence: or_empty("emergence", emergence),
                    stats: or_empty("stats", stats),
                };
                log_snapshot(&snapshot);
                Ok(snapshot)
            }
        }
    }

    async fn timed<T>(&self, feed: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.config.fetch_timeout, fut).await {
            Ok(result) => result.with_context(|| format!("{} feed failed", feed)),
            Err(_) => Err(anyhow::anyhow!(
                "{} feed timed out after {:?}",
                feed,
                self.config.fetch_timeout
            )),
        }
    }
}

fn or_empty<T: Default>(feed: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("Continuing without {} feed: {:#}", feed, e);
        T::default()
    })
}

fn log_snapshot(snapshot: &SignalSnapshot) {
    tracing::debug!(
        themes = snapshot.themes.len(),
        inflections = snapshot.emergence.inflection_founders.len(),
        "Signal snapshot fetched"
    );
}

// ============================================================================
// Analysis
// ============================================================================

/// Run the filtering and ranking steps over a snapshot
pub fn analyze(
    snapshot: &SignalSnapshot,
    host: Option<&str>,
    profile: Option<&HostProfile>,
    min_domain_signal: usize,
) -> BriefSignals {
    let inflections = filter_inflections(&snapshot.emergence.inflection_founders);
    let ranked = rank_themes(&snapshot.themes);

    let domain = domain::classify(host);
    let display = display_themes(&ranked, domain);

    let hot_sector = sector_heat(&snapshot.themes).into_iter().next();

    let relevant = match profile {
        Some(p) if p.has_topics() => topic_themes(&ranked, p.topics),
        _ => display.clone(),
    };
    let signal_positive = relevant.len() >= min_domain_signal.max(1);

    BriefSignals {
        domain,
        display_themes: display,
        relevant_themes: relevant,
        hot_sector,
        recent_break: inflections.into_iter().next(),
        signal_positive,
        host_resolved: profile.is_some(),
    }
}

/// Keep up to three inflections that clear the importance bar, in source order
pub fn filter_inflections(events: &[InflectionEvent]) -> Vec<InflectionEvent> {
    events
        .iter()
        .filter(|e| {
            e.score >= INFLECTION_SCORE_BAR
                || NOTABLE_EVENT_TYPES.contains(&e.event_type.as_str())
        })
        .take(MAX_INFLECTIONS)
        .cloned()
        .collect()
}

/// Themes by emergence score, highest first. Ties keep source order.
pub fn rank_themes(themes: &[Theme]) -> Vec<Theme> {
    let mut ranked = themes.to_vec();
    ranked.sort_by(|a, b| b.emergence_score.total_cmp(&a.emergence_score));
    ranked
}

/// Top themes through the domain lens, falling back to the global ranking
/// when the lens leaves fewer than two
pub fn display_themes(ranked: &[Theme], domain: Domain) -> Vec<Theme> {
    let filtered: Vec<&Theme> = ranked
        .iter()
        .filter(|t| domain.matches_theme(&t.name))
        .collect();

    let source: Vec<&Theme> = if filtered.len() >= MIN_DOMAIN_VIEW {
        filtered
    } else {
        ranked.iter().collect()
    };

    source
        .into_iter()
        .take(DISPLAY_THEME_COUNT)
        .cloned()
        .collect()
}

/// Founder totals per sector, hottest first. "Other" is excluded.
pub fn sector_heat(themes: &[Theme]) -> Vec<SectorHeat> {
    let mut sectors: Vec<SectorHeat> = Vec::new();

    for theme in themes {
        let sector = if theme.sector.is_empty() {
            OTHER_SECTOR
        } else {
            theme.sector.as_str()
        };
        match sectors.iter_mut().find(|s| s.sector == sector) {
            Some(entry) => {
                entry.clusters += 1;
                entry.founders = entry.founders.saturating_add(theme.builder_count);
            }
            None => sectors.push(SectorHeat {
                sector: sector.to_string(),
                founders: theme.builder_count,
                clusters: 1,
            }),
        }
    }

    sectors.retain(|s| s.sector != OTHER_SECTOR);
    sectors.sort_by(|a, b| b.founders.cmp(&a.founders));
    sectors
}

/// Ranked themes naming one of the host's topics with enough builders behind them
pub fn topic_themes(ranked: &[Theme], topics: &[&str]) -> Vec<Theme> {
    let matcher = TopicMatcher::new(topics);
    ranked
        .iter()
        .filter(|t| t.builder_count >= MIN_TOPIC_BUILDERS && matcher.matches(&t.name))
        .cloned()
        .collect()
}

// ============================================================================
// Composition
// ============================================================================

/// Build the ordered points from analyzed signals
pub fn compose_points(signals: &BriefSignals, profile: Option<&HostProfile>) -> Vec<String> {
    let mut points = Vec::new();
    let topics: &[&str] = profile.map(|p| p.topics).unwrap_or(&[]);

    // Host context
    if let Some(p) = profile {
        points.push(format!("Host: {} {}", p.angle, p.hook));
    }

    // Ice breaker
    if let Some(icebreaker) = profile.and_then(|p| p.icebreaker) {
        points.push(format!("Ice breaker: {}", icebreaker));
    }

    if signals.signal_positive {
        let mut relevant = signals.relevant_themes.iter();
        if let Some(top) = relevant.next() {
            points.push(format!(
                "Pattern: \"{}\" is the sharpest cluster in this domain — {} founders building independently. Early signal, not yet visible in press.",
                top.name, top.builder_count
            ));
        }
        if let Some(second) = relevant.next() {
            points.push(format!(
                "Pattern: \"{}\" — {} founders. Second convergence point in the same space.",
                second.name, second.builder_count
            ));
        }
    } else if !topics.is_empty() {
        // No domain signal: be honest and pivot to methodology
        let named = topics.iter().take(2).copied().collect::<Vec<_>>().join(" / ");
        points.push(format!(
            "Precognition doesn't have strong {} signal yet — this vertical isn't well-represented in the dataset. Your edge is the methodology itself: you surface pre-visibility founder density before the market sees it. That's the conversation to have.",
            named
        ));
    } else {
        if let Some(hot) = &signals.hot_sector {
            points.push(format!(
                "Precognition signal: {} is the most active sector right now — {} founders across {} clusters. Mention it if AI / dev tools comes up.",
                hot.sector, hot.founders, hot.clusters
            ));
        }
        if let Some(top) = signals.display_themes.first() {
            points.push(format!(
                "Strongest cluster this week: \"{}\" — {} founders converging independently. Early signal.",
                top.name, top.builder_count
            ));
        }
    }

    // Opening questions
    let questions: Vec<&str> = match profile {
        Some(p) if !p.questions.is_empty() => p.questions.to_vec(),
        _ => DEFAULT_QUESTIONS.to_vec(),
    };
    points.push(format_questions(&questions));

    // Live break, only when it speaks to the host's topics
    if let Some(event) = &signals.recent_break {
        if break_is_relevant(event, topics) {
            let label = event
                .founder_name
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(event.founder_handle.as_deref().filter(|s| !s.is_empty()))
                .unwrap_or("A tracked founder");
            let signal = event
                .signal
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("crossed a momentum threshold this week");
            points.push(format!(
                "Live signal: {} — {}. Pre-visibility from Precognition.",
                label, signal
            ));
        }
    }

    // Posture, always last
    let posture = profile
        .map(|p| p.posture())
        .unwrap_or_else(|| DEFAULT_POSTURE.to_string());
    points.push(format!("Posture: {}", posture));

    points
}

fn format_questions(questions: &[&str]) -> String {
    let numbered: Vec<String> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect();
    format!("Questions to open with:\n{}", numbered.join("\n"))
}

fn break_is_relevant(event: &InflectionEvent, topics: &[&str]) -> bool {
    if topics.is_empty() {
        return true;
    }
    let context = format!(
        "{} {}",
        event.founder_name.as_deref().unwrap_or(""),
        event.signal.as_deref().unwrap_or("")
    )
    .to_lowercase();
    topics.iter().any(|t| context.contains(t))
}

/// Truncate to `cap` points while keeping the final posture point
pub fn apply_cap(mut points: Vec<String>, cap: Option<usize>) -> Vec<String> {
    let Some(cap) = cap else {
        return points;
    };
    if cap == 0 || points.len() <= cap {
        return points;
    }
    let posture = points.pop();
    points.truncate(cap - 1);
    points.extend(posture);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Canned signal source; `None` feeds fail
    #[derive(Default)]
    struct FakeSource {
        themes: Option<Vec<Theme>>,
        emergence: Option<EmergenceFeed>,
        stats: Option<serde_json::Value>,
        delay: Option<Duration>,
        stats_delay: Option<Duration>,
        stats_calls: AtomicUsize,
    }

    impl FakeSource {
        fn healthy(themes: Vec<Theme>, inflections: Vec<InflectionEvent>) -> Self {
            Self {
                themes: Some(themes),
                emergence: Some(EmergenceFeed {
                    inflection_founders: inflections,
                    new_themes: None,
                }),
                stats: Some(serde_json::json!({})),
                ..Default::default()
            }
        }
    }

    impl SignalSource for FakeSource {
        async fn themes(&self) -> Result<Vec<Theme>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.themes.clone().ok_or_else(|| anyhow::anyhow!("connection refused"))
        }

        async fn emergence(&self) -> Result<EmergenceFeed> {
            self.emergence.clone().ok_or_else(|| anyhow::anyhow!("connection refused"))
        }

        async fn stats(&self) -> Result<serde_json::Value> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.stats_delay {
                tokio::time::sleep(delay).await;
            }
            self.stats.clone().ok_or_else(|| anyhow::anyhow!("connection refused"))
        }
    }

    fn theme(name: &str, sector: &str, builders: u32, score: f64) -> Theme {
        Theme {
            name: name.to_string(),
            sector: sector.to_string(),
            builder_count: builders,
            emergence_score: score,
        }
    }

    fn inflection(name: Option<&str>, signal: Option<&str>, score: f64, kind: &str) -> InflectionEvent {
        InflectionEvent {
            founder_name: name.map(String::from),
            founder_handle: None,
            signal: signal.map(String::from),
            score,
            event_type: kind.to_string(),
        }
    }

    fn ai_profile() -> HostProfile {
        HostProfile {
            general_partner: "Test GP",
            focus: "AI",
            investment_stage: "seed",
            topics: &["ai"],
            angle: "Backs AI platforms.",
            hook: "Lead with the shift.",
            icebreaker: None,
            questions: &[],
            posture_note: Some("Think big."),
        }
    }

    fn engine<'a>(source: FakeSource, hosts: &'a [HostEntry]) -> BriefEngine<'a, FakeSource> {
        BriefEngine::with_hosts(source, BriefConfig::default(), hosts)
    }

    #[test]
    fn test_filter_inflections_bar_and_cap() {
        let events = vec![
            inflection(Some("low"), None, 5.0, "mention"),
            inflection(Some("a"), None, 25.0, "mention"),
            inflection(Some("b"), None, 1.0, "star_spike"),
            inflection(Some("c"), None, 20.0, "mention"),
            inflection(Some("d"), None, 2.0, "commit_spike"),
        ];
        let kept = filter_inflections(&events);
        let names: Vec<_> = kept.iter().map(|e| e.founder_name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_rank_themes_stable_descending() {
        let ranked = rank_themes(&[
            theme("low", "X", 1, 0.1),
            theme("tie-first", "X", 1, 0.5),
            theme("high", "X", 1, 0.9),
            theme("tie-second", "X", 1, 0.5),
        ]);
        let names: Vec<_> = ranked.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["high", "tie-first", "tie-second", "low"]);
    }

    #[test]
    fn test_display_themes_domain_filter_and_fallback() {
        let ranked = rank_themes(&[
            theme("Vector databases", "Infra", 9, 0.9),
            theme("Creator tools", "Consumer", 7, 0.8),
            theme("Food delivery", "Consumer", 4, 0.7),
            theme("Retail analytics", "Consumer", 3, 0.6),
            theme("Brand studios", "Consumer", 2, 0.5),
        ]);

        let consumer = display_themes(&ranked, Domain::Consumer);
        let names: Vec<_> = consumer.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Creator tools", "Food delivery", "Retail analytics"]);

        // No security themes: fall back to the global ranking
        let security = display_themes(&ranked, Domain::Security);
        assert_eq!(security[0].name, "Vector databases");
        assert_eq!(security.len(), 3);
    }

    #[test]
    fn test_sector_heat_excludes_other() {
        let heat = sector_heat(&[
            theme("a", "Infra", 5, 0.1),
            theme("b", "Other", 50, 0.1),
            theme("c", "Consumer", 8, 0.1),
            theme("d", "Infra", 6, 0.1),
            theme("e", "", 40, 0.1),
        ]);
        assert_eq!(heat.len(), 2);
        assert_eq!(
            heat[0],
            SectorHeat { sector: "Infra".to_string(), founders: 11, clusters: 2 }
        );
        assert_eq!(heat[1].sector, "Consumer");
    }

    #[test]
    fn test_topic_themes_requires_builders_and_word_start() {
        let ranked = rank_themes(&[
            theme("AI infra tools", "Infra", 12, 0.9),
            theme("AI for farms", "Agri", 3, 0.8),
            theme("Retail ops", "Consumer", 30, 0.7),
            theme("Agentic AI", "Infra", 6, 0.6),
        ]);
        let relevant = topic_themes(&ranked, &["ai"]);
        let names: Vec<_> = relevant.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["AI infra tools", "Agentic AI"]);
    }

    #[test]
    fn test_apply_cap_keeps_posture_last() {
        let points: Vec<String> = (1..=7).map(|i| format!("p{i}")).collect();
        let capped = apply_cap(points.clone(), Some(5));
        assert_eq!(capped, vec!["p1", "p2", "p3", "p4", "p7"]);
        assert_eq!(apply_cap(points.clone(), None).len(), 7);
        assert_eq!(apply_cap(points.clone(), Some(10)).len(), 7);
        assert_eq!(apply_cap(points, Some(1)), vec!["p7"]);
    }

    #[tokio::test]
    async fn test_unknown_host_still_gets_posture() {
        let source = FakeSource::healthy(vec![theme("Dev tooling", "Infra", 8, 0.7)], vec![]);
        let points = engine(source, hosts::profiles())
            .generate_brief("Rust meetup", Some("Local Rust Meetup"))
            .await;

        assert!(!points.is_empty());
        assert_eq!(points.last().unwrap(), &format!("Posture: {}", DEFAULT_POSTURE));
        assert!(!points.iter().any(|p| p.starts_with("Host:")));
    }

    #[tokio::test]
    async fn test_any_feed_failure_yields_single_fallback() {
        for failing in 0..3 {
            let mut source = FakeSource::healthy(vec![theme("x", "Infra", 8, 0.7)], vec![]);
            match failing {
                0 => source.themes = None,
                1 => source.emergence = None,
                _ => source.stats = None,
            }
            let eng = engine(source, hosts::profiles());
            let first = eng.generate_brief("Demo Day", Some("a16z")).await;
            let second = eng.generate_brief("Demo Day", Some("a16z")).await;
            assert_eq!(first, vec![DATA_UNAVAILABLE.to_string()]);
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let mut source = FakeSource::healthy(vec![theme("x", "Infra", 8, 0.7)], vec![]);
        source.delay = Some(Duration::from_secs(5));
        let config = BriefConfig {
            fetch_timeout: Duration::from_millis(20),
            ..BriefConfig::default()
        };
        let eng = BriefEngine::new(source, config);
        let points = eng.generate_brief("Dinner", None).await;
        assert_eq!(points, vec![DATA_UNAVAILABLE.to_string()]);
    }

    #[tokio::test]
    async fn test_abort_policy_does_not_wait_for_slow_feeds() {
        let mut source = FakeSource::healthy(vec![], vec![]);
        source.themes = None;
        source.stats_delay = Some(Duration::from_secs(30));
        let config = BriefConfig {
            fetch_timeout: Duration::from_secs(60),
            ..BriefConfig::default()
        };
        let eng = BriefEngine::new(source, config);

        let started = std::time::Instant::now();
        let points = eng.generate_brief("Dinner", None).await;
        assert_eq!(points, vec![DATA_UNAVAILABLE.to_string()]);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_sector_heat_saturates_founder_totals() {
        let heat = sector_heat(&[
            theme("Big cluster", "Infra", u32::MAX, 0.9),
            theme("Another", "Infra", 10, 0.8),
        ]);
        assert_eq!(heat[0].founders, u32::MAX);
        assert_eq!(heat[0].clusters, 2);
    }

    #[tokio::test]
    async fn test_best_effort_proceeds_without_failed_feed() {
        let mut source = FakeSource::healthy(vec![], vec![]);
        source.themes = None;
        source.emergence = Some(EmergenceFeed {
            inflection_founders: vec![inflection(Some("Ada"), Some("shipped v1"), 40.0, "x")],
            new_themes: None,
        });
        let config = BriefConfig {
            fetch_policy: FetchPolicy::BestEffort,
            ..BriefConfig::default()
        };
        let eng = BriefEngine::new(source, config);
        let points = eng.generate_brief("Mixer", Some("Unknown Host")).await;

        assert!(points.iter().any(|p| p.starts_with("Live signal: Ada — shipped v1.")));
        assert!(points.last().unwrap().starts_with("Posture:"));
    }

    #[tokio::test]
    async fn test_best_effort_total_outage_falls_back() {
        let source = FakeSource::default();
        let config = BriefConfig {
            fetch_policy: FetchPolicy::BestEffort,
            ..BriefConfig::default()
        };
        let points = BriefEngine::new(source, config).generate_brief("Mixer", None).await;
        assert_eq!(points, vec![DATA_UNAVAILABLE.to_string()]);
    }

    #[tokio::test]
    async fn test_stats_feed_is_fetched() {
        let source = FakeSource::healthy(vec![], vec![]);
        let eng = engine(source, hosts::profiles());
        eng.generate_brief("Mixer", None).await;
        assert_eq!(eng.source.stats_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_topic_signal_uses_top_two_matching_themes() {
        let table: Vec<HostEntry> = vec![("testfund", ai_profile())];
        let source = FakeSource::healthy(
            vec![
                theme("Dev tooling", "Infra", 40, 0.95),
                theme("Agentic AI", "Infra", 7, 0.6),
                theme("AI infra tools", "Infra", 12, 0.9),
                theme("AI chips", "Hardware", 5, 0.99),
                theme("AI evals", "Infra", 9, 0.5),
            ],
            vec![],
        );
        let points = engine(source, &table)
            .generate_brief("Summit", Some("TestFund summit"))
            .await;

        assert_eq!(points.len(), 5);
        assert_eq!(points[0], "Host: Backs AI platforms. Lead with the shift.");
        assert!(points[1].starts_with("Pattern: \"AI infra tools\" is the sharpest cluster"));
        assert!(points[1].contains("12 founders"));
        assert_eq!(
            points[2],
            "Pattern: \"Agentic AI\" — 7 founders. Second convergence point in the same space."
        );
        assert!(!points.iter().any(|p| p.contains("Dev tooling") || p.contains("AI chips")));
        assert!(points[3].starts_with("Questions to open with:\n1. "));
        assert_eq!(points[4], format!("Posture: {} Think big.", DEFAULT_POSTURE));
    }

    #[tokio::test]
    async fn test_topics_without_signal_pivot_to_methodology() {
        let table: Vec<HostEntry> = vec![("testfund", ai_profile())];
        let source = FakeSource::healthy(
            vec![
                theme("AI infra tools", "Infra", 12, 0.9),
                theme("Dev tooling", "Infra", 8, 0.7),
            ],
            vec![],
        );
        let points = engine(source, &table)
            .generate_brief("Summit", Some("testfund"))
            .await;

        assert!(points[1].starts_with("Precognition doesn't have strong ai signal yet"));
        assert!(!points.iter().any(|p| p.starts_with("Pattern:")));
        assert!(!points.iter().any(|p| p.starts_with("Strongest cluster")));
    }

    #[tokio::test]
    async fn test_single_match_with_threshold_one() {
        // One matching theme is enough when min_domain_signal is lowered
        let table: Vec<HostEntry> = vec![("testfund", ai_profile())];
        let source = FakeSource::healthy(
            vec![
                theme("AI infra tools", "Infra", 12, 0.9),
                theme("Dev tooling", "Infra", 8, 0.7),
            ],
            vec![],
        );
        let config = BriefConfig {
            min_domain_signal: 1,
            ..BriefConfig::default()
        };
        let points = BriefEngine::with_hosts(source, config, &table)
            .generate_brief("Summit", Some("testfund"))
            .await;

        assert_eq!(points.len(), 4);
        assert!(points[0].starts_with("Host:"));
        assert!(points[1].contains("\"AI infra tools\""));
        assert!(points[1].contains("12 founders"));
        assert!(points[2].starts_with("Questions to open with:"));
        assert!(points[3].starts_with("Posture:"));
    }

    #[tokio::test]
    async fn test_no_topics_uses_generic_signal_and_break() {
        let source = FakeSource::healthy(
            vec![
                theme("Dev tooling", "Infra", 8, 0.7),
                theme("Creator tools", "Consumer", 15, 0.8),
                theme("Cloud cost", "Infra", 9, 0.2),
            ],
            vec![InflectionEvent {
                founder_name: None,
                founder_handle: Some("@grace".to_string()),
                signal: None,
                score: 3.0,
                event_type: "star_spike".to_string(),
            }],
        );
        // Precursor has an empty topic list
        let report = engine(source, hosts::profiles())
            .report("Pre-seed dinner", Some("Precursor Ventures"))
            .await
            .unwrap();
        let points = &report.brief.points;

        // Three display themes count as signal-positive
        assert!(report.signals.signal_positive);
        assert!(points[2].starts_with("Pattern: \"Creator tools\""));
        assert!(points[3].starts_with("Pattern: \"Dev tooling\""));
        assert!(points.iter().any(|p| p
            == "Live signal: @grace — crossed a momentum threshold this week. Pre-visibility from Precognition."));
        assert!(points.last().unwrap().contains("With Precursor"));
    }

    #[tokio::test]
    async fn test_no_topics_sparse_data_falls_back_to_hot_sector() {
        let source = FakeSource::healthy(vec![theme("Dev tooling", "Infra", 8, 0.7)], vec![]);
        let points = engine(source, hosts::profiles())
            .generate_brief("Mixer", None)
            .await;

        assert_eq!(points.len(), 4);
        assert_eq!(
            points[0],
            "Precognition signal: Infra is the most active sector right now — 8 founders across 1 clusters. Mention it if AI / dev tools comes up."
        );
        assert_eq!(
            points[1],
            "Strongest cluster this week: \"Dev tooling\" — 8 founders converging independently. Early signal."
        );
        assert!(points[2].contains(DEFAULT_QUESTIONS[0]));
    }

    #[tokio::test]
    async fn test_break_filtered_by_host_topics() {
        let table: Vec<HostEntry> = vec![("testfund", ai_profile())];
        let themes = vec![theme("Soil sensors", "Agri", 9, 0.4)];

        let off_topic = FakeSource::healthy(
            themes.clone(),
            vec![inflection(Some("Lin"), Some("star spike on soil repo"), 50.0, "x")],
        );
        let points = engine(off_topic, &table).generate_brief("x", Some("testfund")).await;
        assert!(!points.iter().any(|p| p.starts_with("Live signal:")));

        let on_topic = FakeSource::healthy(
            themes,
            vec![inflection(Some("Lin"), Some("new AI agent repo"), 50.0, "x")],
        );
        let points = engine(on_topic, &table).generate_brief("x", Some("testfund")).await;
        let live = points.iter().position(|p| p.starts_with("Live signal: Lin")).unwrap();
        assert_eq!(live, points.len() - 2);
    }

    #[tokio::test]
    async fn test_icebreaker_follows_host_point() {
        let source = FakeSource::healthy(vec![], vec![]);
        let points = engine(source, hosts::profiles())
            .generate_brief("Founder dinner", Some("Hustle Fund"))
            .await;

        assert!(points[0].starts_with("Host: Hustle Fund bets on founder speed"));
        assert!(points[1].starts_with("Ice breaker: Elizabeth Yin"));
        assert!(points[2].starts_with("Precognition doesn't have strong saas / b2b signal yet"));
        assert!(points[3].contains("1. \"How do you separate"));
        assert!(points[3].contains("\n3. \"Where do you think pre-seed"));
    }

    #[tokio::test]
    async fn test_cap_from_config() {
        let source = FakeSource::healthy(
            vec![
                theme("Dev tooling", "Infra", 8, 0.7),
                theme("Cloud cost", "Infra", 9, 0.2),
            ],
            vec![inflection(Some("Ada"), None, 99.0, "x")],
        );
        let config = BriefConfig {
            max_points: Some(5),
            ..BriefConfig::default()
        };
        let points = BriefEngine::new(source, config)
            .generate_brief("YC Demo Day", Some("Y Combinator"))
            .await;
        assert_eq!(points.len(), 5);
        assert!(points[4].starts_with("Posture:"));
    }

    #[test]
    fn test_blocking_report_via_tokio_test() {
        let source = FakeSource::healthy(vec![], vec![]);
        let report = tokio_test::block_on(engine(source, hosts::profiles()).report("x", None)).unwrap();
        assert!(!report.signals.host_resolved);
        assert_eq!(report.brief.event_name, "x");
    }
}
