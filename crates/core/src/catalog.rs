//! Seed catalog - the hand-authored content set
//!
//! Eight items, two per topic (health, technology & economy, environment, social
//! scams), one genuine and one false in each pair. The catalog deals the opening
//! hand of every session and backs the fallback path when the generator is down.

use std::sync::OnceLock;

use crate::rng::SimpleRng;
use crate::types::{ContentItem, Verdict};

/// Topic grouping of the seed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Health,
    TechEconomy,
    Environment,
    SocialScam,
}

impl Topic {
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Health => "Health",
            Topic::TechEconomy => "Technology & Economy",
            Topic::Environment => "Environment",
            Topic::SocialScam => "Social Scams",
        }
    }
}

struct SeedItem {
    id: &'static str,
    topic: Topic,
    headline: &'static str,
    source: &'static str,
    url: &'static str,
    content: &'static str,
    verdict: Verdict,
    image: u32,
    explanation: &'static str,
    indicators: &'static [&'static str],
}

const SEED: [SeedItem; 8] = [
    SeedItem {
        id: "h1",
        topic: Topic::Health,
        headline: "Scientists Find Wild Borneo Plant That Cures Diabetes Completely",
        source: "Nusantara Health Info",
        url: "www.miracle-herbs-borneo.blogspot.com/big-discovery",
        content: "An independent researcher claims the root of the \"Sakar\" plant drops blood sugar to zero overnight with no side effects.",
        verdict: Verdict::False,
        image: 11,
        explanation: "An exaggerated medical claim with no clinical trial behind it, published on a free blog domain for information that is critical to health.",
        indicators: &["Free Hosting Domain", "Instant Cure Claim", "Unidentified Researcher"],
    },
    SeedItem {
        id: "h2",
        topic: Topic::Health,
        headline: "Health Ministry Launches Free Second Booster Shot for Seniors",
        source: "Healthy Nation (Ministry of Health)",
        url: "www.kemkes.go.id/article/free-senior-booster",
        content: "Starting next week, residents over 60 can visit their nearest community health centre to receive a booster dose at no cost.",
        verdict: Verdict::Genuine,
        image: 22,
        explanation: "Published on an official government domain (.go.id) and points to a concrete public service location.",
        indicators: &[".go.id Domain", "Official Agency", "Public Service Notice"],
    },
    SeedItem {
        id: "t1",
        topic: Topic::TechEconomy,
        headline: "Warning: Phone Chips Can Explode If Charged Longer Than 5 Hours",
        source: "Viral Tech News",
        url: "www.fact-check-news.com/global-phone-explosion",
        content: "A new report describes a lithium battery flaw that makes phones explode when left plugged in overnight.",
        verdict: Verdict::False,
        image: 33,
        explanation: "Alarmist wording (\"Warning\", \"Explode\"). Modern phones cut off charging automatically to prevent overcharge.",
        indicators: &["Provocative Language", "Technically Wrong", "Anonymous Source"],
    },
    SeedItem {
        id: "t2",
        topic: Topic::TechEconomy,
        headline: "Indonesian Coffee Exporters Break Into Europe With a 50 Billion Rupiah Contract",
        source: "Indonesian Economic Review",
        url: "www.ekonews.id/coffee-export-europe",
        content: "A Gayo farmers' cooperative signed a long-term contract to supply coffee beans to cafe chains in Germany and the Netherlands.",
        verdict: Verdict::Genuine,
        image: 44,
        explanation: "Upbeat business news with realistic figures that names specific business entities.",
        indicators: &["Realistic Figures", "Specific Entities", "Neutral Tone"],
    },
    SeedItem {
        id: "l1",
        topic: Topic::Environment,
        headline: "Jakarta Temperatures Will Reach 50 Degrees Celsius Tomorrow Afternoon",
        source: "Extreme Weather Alert",
        url: "www.bmkg-alert.info/jakarta-boiling-heat",
        content: "The weather agency urges residents to stay indoors as an extreme heatwave hits the capital tomorrow.",
        verdict: Verdict::False,
        image: 55,
        explanation: "Borrows an official agency name in a fake .info URL. The temperature is implausible for a tropical climate.",
        indicators: &["Imitation Agency URL", "Implausible Numbers", "Spreads Panic"],
    },
    SeedItem {
        id: "l2",
        topic: Topic::Environment,
        headline: "Weather Agency Predicts Early Rainy Season in Southern Regions",
        source: "BMKG Indonesia",
        url: "www.bmkg.go.id/news/rainy-season-forecast",
        content: "Based on sea surface temperature anomalies, heavy rainfall is expected over Java and Bali from early October.",
        verdict: Verdict::Genuine,
        image: 66,
        explanation: "An official statement from the national weather monitoring institution on a legitimate government domain.",
        indicators: &[".go.id Domain", "Scientific Data", "Official Statement"],
    },
    SeedItem {
        id: "s1",
        topic: Topic::SocialScam,
        headline: "5 Million Rupiah Aid Per Household, Check Your Name at This Link",
        source: "Social Aid Portal",
        url: "www.gov-social-aid-2024.xyz/click-here",
        content: "The government is handing out cash for Independence Day. Fill in your personal details and bank account number now.",
        verdict: Verdict::False,
        image: 77,
        explanation: "A phishing scheme on a .xyz domain asking for sensitive data and bank details with the lure of free money.",
        indicators: &[".xyz Domain", "Phishing Pattern", "Money Lure"],
    },
    SeedItem {
        id: "s2",
        topic: Topic::SocialScam,
        headline: "New Passport Rules: Validity Extended to 10 Years",
        source: "Directorate General of Immigration",
        url: "www.imigrasi.go.id/press-release/ten-year-passport",
        content: "A ministerial regulation sets passport validity at 10 years for citizens over 17.",
        verdict: Verdict::Genuine,
        image: 88,
        explanation: "A public policy announced widely through the ministry's official news channels.",
        indicators: &["Official Domain", "Enacted Policy", "Credible Source"],
    },
];

impl SeedItem {
    fn to_item(&self) -> ContentItem {
        ContentItem {
            id: self.id.to_string(),
            headline: self.headline.to_string(),
            source: self.source.to_string(),
            url: self.url.to_string(),
            content: self.content.to_string(),
            verdict: self.verdict,
            image_url: format!("https://picsum.photos/600/400?random={}", self.image),
            explanation: self.explanation.to_string(),
            indicators: self.indicators.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The fixed seed catalog, in authored order.
pub fn catalog() -> &'static [ContentItem] {
    static CATALOG: OnceLock<Vec<ContentItem>> = OnceLock::new();
    CATALOG.get_or_init(|| SEED.iter().map(SeedItem::to_item).collect())
}

/// Topic of a catalog item, if `id` belongs to the catalog.
pub fn topic_of(id: &str) -> Option<Topic> {
    SEED.iter().find(|s| s.id == id).map(|s| s.topic)
}

/// The whole catalog in a fresh random order.
pub fn sample_shuffled(rng: &mut SimpleRng) -> Vec<ContentItem> {
    rng.permutation(catalog())
}
