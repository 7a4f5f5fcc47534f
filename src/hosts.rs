//! Host knowledge base: curated intel on the funds and communities that convene events
//!
//! Keys are lowercase fragments of a host's display name. Lookup is
//! substring-contains over an ordered table, so the first entry whose key
//! appears anywhere in the host string wins. Overlapping keys are not
//! disambiguated.

use serde::Serialize;

/// Shared behavioral guidance for every event
pub const DEFAULT_POSTURE: &str = "You are a VC scout with a signal edge, not a job seeker. Lead by sharing what you are tracking. If roles come up: \"I am looking for a home where I can do this kind of sourcing at scale.\" Never ask about open positions directly.";

/// Opening questions used when a host has none of its own
pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "\"What are you seeing in your deal flow right now that most people aren't paying attention to yet?\"",
    "\"Where do you think founder density is building before the market has noticed?\"",
    "\"What would make you immediately excited about a founder you just met?\"",
];

/// Curated metadata for a known host
#[derive(Debug, Clone, Serialize)]
pub struct HostProfile {
    pub general_partner: &'static str,
    pub focus: &'static str,
    pub investment_stage: &'static str,
    /// Lowercase keyword fragments matched against theme names
    pub topics: &'static [&'static str],
    pub angle: &'static str,
    pub hook: &'static str,
    pub icebreaker: Option<&'static str>,
    pub questions: &'static [&'static str],
    /// Host-specific guidance appended to [`DEFAULT_POSTURE`]
    pub posture_note: Option<&'static str>,
}

impl HostProfile {
    /// Full posture guidance for this host
    pub fn posture(&self) -> String {
        match self.posture_note {
            Some(note) => format!("{} {}", DEFAULT_POSTURE, note),
            None => DEFAULT_POSTURE.to_string(),
        }
    }

    pub fn has_topics(&self) -> bool {
        !self.topics.is_empty()
    }
}

/// A keyed entry in the knowledge base
pub type HostEntry = (&'static str, HostProfile);

/// Resolve a free-text host string against the built-in table
pub fn resolve_host(host: Option<&str>) -> Option<&'static HostProfile> {
    resolve_in(profiles(), host)
}

/// Resolve against an arbitrary ordered table. First key contained in the
/// lowercased host string wins.
pub fn resolve_in<'a>(table: &'a [HostEntry], host: Option<&str>) -> Option<&'a HostProfile> {
    let host = host?.trim();
    if host.is_empty() {
        return None;
    }
    let lower = host.to_lowercase();
    table
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, profile)| profile)
}

/// All built-in host profiles, in lookup order
pub fn profiles() -> &'static [HostEntry] {
    HOSTS
}

static HOSTS: &[HostEntry] = &[
    (
        "forerunner",
        HostProfile {
            general_partner: "Kirsten Green",
            focus: "consumer, brand, commerce, next-gen retail",
            investment_stage: "Series A–B",
            topics: &["consumer", "retail", "brand", "commerce", "food", "creator"],
            angle: "Forerunner backs brands that shift how people live — cultural timing and consumer psychology over unit economics.",
            hook: "Lead with consumer behavior shifts, not TAM. Kirsten Green thinks in waves of taste, not market maps.",
            icebreaker: Some("Kirsten Green lights up when you mention a specific brand moment — a brand she hasn't heard of that blew up in Europe. Ask her view on the next cultural shift in consumer before it hits US data."),
            questions: &[
                "\"Where are you seeing consumer behavior shift before it shows up in data?\"",
                "\"What does a brand look like today that has the same structural moat as Glossier did in 2015?\"",
                "\"How do you think about EU consumer trends as a leading indicator for the US?\"",
            ],
            posture_note: Some("With Forerunner: share a specific consumer signal from Precognition — a cluster of founders converging on the same behavior shift. That is the language they speak."),
        },
    ),
    (
        "hustle fund",
        HostProfile {
            general_partner: "Elizabeth Yin",
            focus: "pre-seed, B2B SaaS, founder velocity",
            investment_stage: "pre-seed / seed",
            topics: &["saas", "b2b", "productivity", "developer"],
            angle: "Hustle Fund bets on founder speed over pedigree. Elizabeth Yin is vocal that execution velocity is the only signal that matters pre-traction.",
            hook: "Lead with speed of execution and scrappy early traction.",
            icebreaker: Some("Elizabeth Yin is very active on X and writes candidly about VC dysfunction. She likes people who read her work. Also ask about building Hustle Fund small on purpose — she talks about it proudly."),
            questions: &[
                "\"How do you separate genuine execution speed from hustle theater in the first meeting?\"",
                "\"What's the earliest signal you've seen that turned into a real company?\"",
                "\"Where do you think pre-seed is underpriced right now?\"",
            ],
            posture_note: Some("With Hustle Fund: show your own velocity — mention how fast you built Precognition and what it already surfaces."),
        },
    ),
    (
        "precursor",
        HostProfile {
            general_partner: "Charles Hudson",
            focus: "pre-product pre-seed, underrepresented founders",
            investment_stage: "pre-seed",
            topics: &[],
            angle: "Precursor funds ideas and people before there is a product. Most pre-conviction fund in SF.",
            hook: "Lead with a thesis on a space, not a deck. Charles values thinking over traction.",
            icebreaker: Some("Charles Hudson is warm and not typical Sand Hill. Into music and the SF community. Easy opener: what does he think is underrated about the SF ecosystem right now?"),
            questions: &[
                "\"What does a founder look like at the pre-product stage that makes you say yes before anyone else would?\"",
                "\"How do you think about sourcing founders who wouldn't naturally find their way to Sand Hill Road?\"",
                "\"What thesis are you building conviction around right now that isn't consensus yet?\"",
            ],
            posture_note: Some("With Precursor: show your sourcing instinct. You are already doing what their scouts do — finding signal before it is obvious."),
        },
    ),
    (
        "south park commons",
        HostProfile {
            general_partner: "Ruchi Sanghvi / community",
            focus: "technical founders, deep exploration, pre-idea",
            investment_stage: "community / pre-company",
            topics: &["developer", "infrastructure", "research"],
            angle: "SPC is a founder community, not a VC. Members explore ideas together before committing to a company.",
            hook: "Come with intellectual curiosity and a problem you are obsessing over.",
            icebreaker: Some("SPC culture: low ego, curiosity beats credentials. Best opener with anyone in the room: \"what's the problem you can't stop thinking about?\" Works every time."),
            questions: &[
                "\"What kinds of exploration do SPC members do that you don't see in the broader ecosystem?\"",
                "\"Where do you see the most interesting pre-company thinking happening right now?\"",
                "\"What problems do you wish more technical founders were working on?\"",
            ],
            posture_note: Some("SPC values intellectual honesty over polish — be direct about what you are exploring and why."),
        },
    ),
    (
        "a16z",
        HostProfile {
            general_partner: "Marc Andreessen / various",
            focus: "AI, crypto, bio, consumer, fintech",
            investment_stage: "seed through growth",
            topics: &["ai", "crypto", "infrastructure", "developer"],
            angle: "a16z looks for category-defining companies, not incremental improvements. Platform shifts only.",
            hook: "Lead with why this is a platform shift. They want to back the next computing paradigm.",
            icebreaker: Some("a16z partners publish constantly — find who's in the room and reference something specific they've written. They notice when people actually read their work."),
            questions: &[
                "\"What platform shift do you think is still underestimated by the market right now?\"",
                "\"How do you think about founder signal at the earliest stages before a paradigm is obvious?\"",
                "\"Where is the best early-stage activity happening that isn't getting a16z-scale attention yet?\"",
            ],
            posture_note: Some("With a16z: think big. They are not interested in niches. Frame Precognition as a signal infrastructure layer, not a tool."),
        },
    ),
    (
        "collaborative fund",
        HostProfile {
            general_partner: "Craig Shapiro",
            focus: "impact, consumer, climate, future of work",
            investment_stage: "seed–Series A",
            topics: &["consumer", "climate", "impact", "sustainability"],
            angle: "Collaborative Fund backs companies where doing good and doing well are the same bet.",
            hook: "Frame mission as structural moat, not values add-on.",
            icebreaker: Some("Craig Shapiro ties culture (music, skate, art) to brand infrastructure. Ask what he thinks has changed in impact investing over the last 5 years — he has strong opinions and enjoys the question."),
            questions: &[
                "\"Where do you see mission becoming a competitive advantage rather than a marketing layer?\"",
                "\"What impact vertical is most underinvested relative to the founder activity you're seeing?\"",
                "\"How do you think about consumer brands where the EU market is 2-3 years ahead of the US?\"",
            ],
            posture_note: Some("With Collaborative: your EU impact background (Lita.co) is directly relevant. Lead with that lens."),
        },
    ),
    (
        "first round",
        HostProfile {
            general_partner: "Josh Kopelman",
            focus: "B2B SaaS, marketplace, consumer tech",
            investment_stage: "seed",
            topics: &["saas", "marketplace", "consumer", "b2b"],
            angle: "First Round is the gold standard seed fund — known for deep founder support and the First Round Review.",
            hook: "Show you have done the work on your category. They love founders who think like writers.",
            icebreaker: Some("Josh Kopelman is self-deprecating and direct. Opener: \"what do you think seed investing consistently gets wrong about founder-market fit?\" He will have an answer."),
            questions: &[
                "\"What does the First Round Review tell you about what founders are actually struggling with right now?\"",
                "\"Where do you see seed-stage companies getting the most leverage from AI tools in their operations?\"",
                "\"What category do you wish you were seeing more founder activity in?\"",
            ],
            posture_note: Some("First Round respects deep category knowledge. Show you have done the reading."),
        },
    ),
    (
        "imaginary",
        HostProfile {
            general_partner: "Natalie Massenet",
            focus: "luxury, fashion, consumer, culture",
            investment_stage: "seed–Series A",
            topics: &["consumer", "fashion", "luxury", "brand", "retail", "creator"],
            angle: "Imaginary Ventures is the EU-to-US taste bridge. Natalie Massenet built Net-a-Porter — she pattern-matches on category-defining consumer brands.",
            hook: "Your EU consumer lens is your edge here. Lead with it.",
            icebreaker: Some("Natalie Massenet built Net-a-Porter in London and has a strong sense of European culture. Opener: name a brand you've seen in Paris that hasn't landed in the US yet, and why it will. That's her language."),
            questions: &[
                "\"How do you think about EU consumer brands as early signals for what the US market will want in 2-3 years?\"",
                "\"What does a luxury brand look like today that has the distribution moat Net-a-Porter had in 2000?\"",
                "\"Where is taste shifting in consumer that hasn't been fully captured by US founders yet?\"",
            ],
            posture_note: Some("With Natalie: your EU background is the pitch. You have seen what US consumers want before they know they want it."),
        },
    ),
    (
        "dbl partners",
        HostProfile {
            general_partner: "Nancy Pfund",
            focus: "impact, climate, healthcare, education",
            investment_stage: "seed–growth",
            topics: &["climate", "impact", "health", "education", "sustainability"],
            angle: "DBL pioneered impact + returns. They backed Tesla and Revolution Foods — mission as structural business advantage.",
            hook: "Show the impact thesis is load-bearing, not decorative.",
            icebreaker: Some("Nancy Pfund backed Tesla in 2006 when it was deeply unfashionable. She responds to rigour, not optimism. Ask how she thinks about the current climate hype cycle versus what DBL saw then."),
            questions: &[
                "\"What does a company look like today where the impact thesis is actually what creates the defensibility?\"",
                "\"Where do you see climate tech founder activity concentrating before the capital has followed?\"",
                "\"How has the definition of 'double bottom line' shifted since you backed Tesla?\"",
            ],
            posture_note: Some("DBL values rigor over optimism. Come with a specific signal, not a vision."),
        },
    ),
    (
        "y combinator",
        HostProfile {
            general_partner: "Garry Tan",
            focus: "all sectors, global, technical founders",
            investment_stage: "pre-seed",
            topics: &[],
            angle: "YC is the highest-signal accelerator in the world. W26 batch surfaces the best early-stage companies of the year.",
            hook: "Spotting the one company others will miss is the game. Come with a sector thesis.",
            icebreaker: Some("YC social opener with anyone in the room: \"which presentation surprised you the most?\" Instant conversation starter. With YC staff: be precise on sector thesis — \"excited about AI\" won't land."),
            questions: &[
                "\"What pattern have you seen in this batch that you didn't expect?\"",
                "\"Which sectors are the most technically ambitious founders gravitating toward right now?\"",
                "\"Where do you think YC is still underrepresented in terms of founder backgrounds or geographies?\"",
            ],
            posture_note: Some("At YC events: sector thesis is your currency. Show you can spot the non-obvious one."),
        },
    ),
    (
        "arnaud auger",
        HostProfile {
            general_partner: "Arnaud Auger",
            focus: "AI, deep tech, longevity, neurotech, cognitive health",
            investment_stage: "Series A–C",
            topics: &["longevity", "health", "brain", "neuro", "biotech", "aging"],
            angle: "Arnaud Auger is Director at Cathay Innovation ($2.7B AUM) and co-founder of Don't Die SF. Capital allocator and longevity practitioner — rare combination.",
            hook: "Lead with founder signals in AI × longevity. Show you are tracking the space before it is obvious.",
            icebreaker: Some("He tracks his own health data and has strong opinions on Bryan Johnson — ask his take. Or: what the Don't Die community has taught him about how founders think differently about their own health."),
            questions: &[
                "\"What founder signals tell you something real is happening in a longevity vertical — before press catches it?\"",
                "\"Where is the biggest gap between what the science says is possible and what's actually being built?\"",
                "\"Is Don't Die SF surfacing founders you wouldn't see through traditional deal flow?\"",
            ],
            posture_note: Some("With Arnaud: share your sourcing methodology. \"I track pre-visibility founder density — the same approach applies to longevity, I just don't have the dataset yet.\""),
        },
    ),
    (
        "cathay innovation",
        HostProfile {
            general_partner: "Arnaud Auger",
            focus: "AI, deep tech, longevity, global expansion",
            investment_stage: "Series A–C",
            topics: &["longevity", "health", "brain", "neuro", "ai", "deep tech"],
            angle: "Cathay Innovation ($2.7B AUM) has a real longevity thesis and global lens. Rare combination at this fund size.",
            hook: "Lead with the intersection of AI and longevity biomarkers. Think in decades.",
            icebreaker: Some("Cathay has a unique French-Chinese origin — backed partly by LVMH family office. Good opener: how the fund navigates US-China tech dynamics, or what European founders misunderstand about breaking into the US."),
            questions: &[
                "\"How does Cathay's global LP base shape which longevity bets you take versus a purely US-focused fund?\"",
                "\"What does the longevity founder look like that gets you excited at the Series A stage?\"",
                "\"Where do you see AI making the biggest dent in the aging research pipeline?\"",
            ],
            posture_note: None,
        },
    ),
    (
        "don't die",
        HostProfile {
            general_partner: "Arnaud Auger + Community",
            focus: "longevity, biohacking, neurotech, cognitive health",
            investment_stage: "community",
            topics: &["longevity", "health", "brain", "neuro", "biotech"],
            angle: "Don't Die SF is a longevity practitioner community — founders, investors, and scientists serious about the science.",
            hook: "This crowd respects signal over story. Come with a specific observation, not a vision.",
            icebreaker: Some("Everyone in the room personally tracks their health data. Opener: \"what practice have you added recently that surprised you?\" Almost universal answer — instant human connection before you get to work."),
            questions: &[
                "\"What is the most underrated longevity intervention that doesn't have a company around it yet?\"",
                "\"Where do you see AI creating the most leverage in extending healthspan versus lifespan?\"",
                "\"What founder signal in this space would make you immediately pay attention?\"",
            ],
            posture_note: None,
        },
    ),
    (
        "obvious ventures",
        HostProfile {
            general_partner: "James Joaquin / Ev Williams",
            focus: "health, sustainability, education, impact",
            investment_stage: "seed–Series B",
            topics: &["climate", "health", "education", "sustainability", "impact"],
            angle: "Obvious Ventures backs \"world positive\" companies — profit and planet aligned structurally.",
            hook: "Mission must be load-bearing, not a differentiator.",
            icebreaker: Some("If Ev Williams is there: ask what technology gets wrong about human behaviour — he built Twitter and Medium and thinks deeply about this. James Joaquin is more operational; ask about a portfolio surprise."),
            questions: &[
                "\"How do you identify when a mission is structurally baked in versus bolted on?\"",
                "\"What impact vertical do you think is most underinvested relative to the urgency?\"",
                "\"Where are you seeing founder activity that the impact investing world hasn't priced in yet?\"",
            ],
            posture_note: None,
        },
    ),
    (
        "village global",
        HostProfile {
            general_partner: "Erik Torenberg",
            focus: "B2B SaaS, consumer, founders-first",
            investment_stage: "pre-seed–seed",
            topics: &["saas", "consumer", "community", "b2b"],
            angle: "Village Global is network-driven — peer cohorts over traditional VC hierarchy.",
            hook: "Show you are a connector. Village bets on founders who attract other founders.",
            icebreaker: Some("Erik Torenberg is a prolific writer and podcaster — check if he published something this week and reference it. Good opener: what does he think is the most underrated founder community in SF right now?"),
            questions: &[
                "\"How does the peer cohort model change which founders you see versus a traditional fund?\"",
                "\"What does 'network density' look like as a signal for a company's early trajectory?\"",
                "\"Where do you see the most interesting founder communities forming right now outside of YC?\"",
            ],
            posture_note: None,
        },
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_in_lookup_order() {
        let keys: Vec<&str> = profiles().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), 15);
        assert_eq!(keys[0], "forerunner");
        assert_eq!(keys[14], "village global");
    }

    #[test]
    fn test_keys_are_lowercase() {
        for (key, _) in profiles() {
            assert_eq!(*key, key.to_lowercase(), "key {key} must be lowercase");
        }
    }

    #[test]
    fn test_resolve_embedded_key() {
        let profile = resolve_host(Some("Hustle Fund mixer")).unwrap();
        assert_eq!(profile.general_partner, "Elizabeth Yin");
    }

    #[test]
    fn test_resolve_prefix_suffix_and_middle() {
        for host in ["a16z", "Dinner with a16z", "a16z speedrun", "The A16Z crowd"] {
            let profile = resolve_host(Some(host)).unwrap();
            assert_eq!(profile.general_partner, "Marc Andreessen / various", "host {host}");
        }
    }

    #[test]
    fn test_resolve_empty_and_absent() {
        assert!(resolve_host(Some("")).is_none());
        assert!(resolve_host(Some("   ")).is_none());
        assert!(resolve_host(None).is_none());
    }

    #[test]
    fn test_resolve_no_match() {
        assert!(resolve_host(Some("Local Rust Meetup")).is_none());
    }

    #[test]
    fn test_first_match_wins_for_joined_hosts() {
        // forerunner precedes a16z in the table
        let profile = resolve_host(Some("a16z + Forerunner")).unwrap();
        assert_eq!(profile.general_partner, "Kirsten Green");
    }

    #[test]
    fn test_resolve_in_custom_table() {
        let table: Vec<HostEntry> = vec![
            ("fund", profile_with_partner("Generic")),
            ("fund two", profile_with_partner("Specific")),
        ];
        let profile = resolve_in(&table, Some("Fund Two Summit")).unwrap();
        assert_eq!(profile.general_partner, "Generic");
    }

    #[test]
    fn test_posture_embeds_default() {
        let forerunner = resolve_host(Some("forerunner")).unwrap();
        assert!(forerunner.posture().starts_with(DEFAULT_POSTURE));
        assert!(forerunner.posture().ends_with("That is the language they speak."));

        let cathay = resolve_host(Some("Cathay Innovation")).unwrap();
        assert_eq!(cathay.posture(), DEFAULT_POSTURE);
    }

    #[test]
    fn test_every_profile_has_questions() {
        for (key, profile) in profiles() {
            assert_eq!(profile.questions.len(), 3, "{key} should have three questions");
            assert!(!profile.angle.is_empty());
        }
    }

    fn profile_with_partner(gp: &'static str) -> HostProfile {
        HostProfile {
            general_partner: gp,
            focus: "",
            investment_stage: "",
            topics: &[],
            angle: "",
            hook: "",
            icebreaker: None,
            questions: &[],
            posture_note: None,
        }
    }
}
