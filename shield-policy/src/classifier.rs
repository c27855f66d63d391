//! Category Classifier — keyword-driven app categorization and risk scoring.
//!
//! Classification is a heuristic, not a guarantee: the app's name and id are
//! lowercased and scored against each category's keyword list; the highest
//! score wins, defaulting to `Utility` on a zero-score tie. Callers must
//! treat the category as a policy hint, never as authoritative identity.
//!
//! Each category partitions the permission set three ways: `required`
//! (expected, unremarkable), `optional` (plausible), and everything else
//! (suspicious). Risk = per-permission base weight × a factor derived from
//! that partition and the app's trust flag, clamped to [10,100].

use shield_core::types::{App, PermissionType, RiskLevel};

// ── Category catalog ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppCategory {
    Navigation,
    Photography,
    Communication,
    Social,
    Productivity,
    Gaming,
    Utility,
    Health,
    Finance,
    Education,
    Shopping,
    Travel,
    Weather,
}

/// Static per-category policy: permission partition plus the keywords that
/// vote for the category during classification.
pub struct CategoryProfile {
    pub category: AppCategory,
    pub label: &'static str,
    pub required: &'static [PermissionType],
    pub optional: &'static [PermissionType],
    pub keywords: &'static [&'static str],
    pub description: &'static str,
}

use PermissionType::{CallLogs, Contacts, FileAccess, Location, Messages};

/// Catalog order is the classification tie-break order: with equal nonzero
/// scores the earlier entry wins, and a zero score always falls back to
/// `Utility`. Changing the order silently changes risk scores.
pub const CATALOG: &[CategoryProfile] = &[
    CategoryProfile {
        category: AppCategory::Navigation,
        label: "Navigation",
        required: &[Location],
        optional: &[Contacts, FileAccess],
        keywords: &["map", "navigator", "gps", "location", "direction", "route", "navigation"],
        description: "Maps, GPS, and location-based services",
    },
    CategoryProfile {
        category: AppCategory::Photography,
        label: "Photography",
        required: &[FileAccess],
        optional: &[Location],
        keywords: &["photo", "camera", "image", "editor", "gallery", "filter", "pic"],
        description: "Camera apps, photo editors, and image galleries",
    },
    CategoryProfile {
        category: AppCategory::Communication,
        label: "Communication",
        required: &[Contacts],
        optional: &[CallLogs, Messages, Location],
        keywords: &["call", "message", "chat", "dialer", "phone", "contact", "sms", "email", "mail"],
        description: "Messaging, calling, and video conferencing apps",
    },
    CategoryProfile {
        category: AppCategory::Social,
        label: "Social",
        required: &[Contacts],
        optional: &[Location, FileAccess, Messages],
        keywords: &["social", "connect", "friend", "follow", "share", "post", "network"],
        description: "Social media and networking platforms",
    },
    CategoryProfile {
        category: AppCategory::Productivity,
        label: "Productivity",
        required: &[FileAccess],
        optional: &[Contacts],
        keywords: &["doc", "note", "office", "productivity", "sheet", "slide", "work", "task", "calendar"],
        description: "Document editors, note-taking, and office applications",
    },
    CategoryProfile {
        category: AppCategory::Gaming,
        label: "Gaming",
        required: &[],
        optional: &[Location],
        keywords: &["game", "play", "arcade", "puzzle", "strategy", "sport", "racing"],
        description: "Games and interactive entertainment",
    },
    CategoryProfile {
        category: AppCategory::Utility,
        label: "Utility",
        required: &[],
        optional: &[FileAccess],
        keywords: &["tool", "utility", "scan", "convert", "calculator", "browser", "search"],
        description: "Tools, calculators, and system utilities",
    },
    CategoryProfile {
        category: AppCategory::Health,
        label: "Health & Fitness",
        required: &[],
        optional: &[Location],
        keywords: &["health", "fitness", "workout", "exercise", "diet", "medical", "track"],
        description: "Health monitoring, fitness tracking, and wellness apps",
    },
    CategoryProfile {
        category: AppCategory::Finance,
        label: "Finance",
        required: &[],
        optional: &[Contacts],
        keywords: &["bank", "finance", "money", "payment", "wallet", "budget", "invest"],
        description: "Banking, payment, and financial management apps",
    },
    CategoryProfile {
        category: AppCategory::Education,
        label: "Education",
        required: &[],
        optional: &[FileAccess],
        keywords: &["learn", "edu", "study", "course", "school", "teach", "training"],
        description: "Learning platforms, educational content, and study aids",
    },
    CategoryProfile {
        category: AppCategory::Shopping,
        label: "Shopping",
        required: &[],
        optional: &[Location, Contacts],
        keywords: &["shop", "store", "buy", "cart", "purchase", "order", "retail"],
        description: "E-commerce and retail applications",
    },
    CategoryProfile {
        category: AppCategory::Travel,
        label: "Travel",
        required: &[],
        optional: &[Location, Contacts],
        keywords: &["travel", "trip", "flight", "hotel", "booking", "vacation", "tour"],
        description: "Travel booking, itinerary planning, and tourism apps",
    },
    CategoryProfile {
        category: AppCategory::Weather,
        label: "Weather",
        required: &[],
        optional: &[Location],
        keywords: &["weather", "forecast", "climate", "temperature", "radar"],
        description: "Weather forecasts and meteorological services",
    },
];

fn profile_of(category: AppCategory) -> &'static CategoryProfile {
    CATALOG
        .iter()
        .find(|p| p.category == category)
        .expect("every AppCategory variant has a catalog entry")
}

// ── Risk weights ─────────────────────────────────────────────────────────────

/// Base privacy-exposure weight per permission type, before the partition
/// factor. Messages read highest; call logs lowest of the sensitive set.
fn base_risk_weight(permission: PermissionType) -> f64 {
    match permission {
        PermissionType::Messages => 85.0,
        PermissionType::Contacts => 75.0,
        PermissionType::Location => 70.0,
        PermissionType::FileAccess => 60.0,
        PermissionType::CallLogs => 55.0,
    }
}

const FACTOR_REQUIRED: f64 = 0.3;
const FACTOR_OPTIONAL: f64 = 0.6;
const FACTOR_SUSPICIOUS_TRUSTED: f64 = 0.8;
const FACTOR_SUSPICIOUS_UNTRUSTED: f64 = 1.2;

// ── Classifier ───────────────────────────────────────────────────────────────

/// Stateless policy oracle over the static catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryClassifier;

impl CategoryClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Keyword-vote the app into a category. One point per catalog keyword
    /// contained in the lowercased `name + " " + id` text; strict improvement
    /// wins, `Utility` on a zero-score tie.
    pub fn categorize(&self, app: &App) -> AppCategory {
        let text = format!("{} {}", app.name, app.id).to_lowercase();

        let mut best = AppCategory::Utility;
        let mut best_score = 0usize;
        for profile in CATALOG {
            let score = profile.keywords.iter().filter(|kw| text.contains(*kw)).count();
            if score > best_score {
                best_score = score;
                best = profile.category;
            }
        }
        best
    }

    /// The full catalog entry for the app's inferred category.
    pub fn profile(&self, app: &App) -> &'static CategoryProfile {
        profile_of(self.categorize(app))
    }

    pub fn is_required(&self, app: &App, permission: PermissionType) -> bool {
        self.profile(app).required.contains(&permission)
    }

    pub fn is_optional(&self, app: &App, permission: PermissionType) -> bool {
        self.profile(app).optional.contains(&permission)
    }

    /// Suspicious = neither required nor optional for the inferred category.
    pub fn is_suspicious(&self, app: &App, permission: PermissionType) -> bool {
        let profile = self.profile(app);
        !profile.required.contains(&permission) && !profile.optional.contains(&permission)
    }

    /// Risk score in [10,100]. Required permissions always score low
    /// regardless of trust; suspicious permissions on untrusted apps score
    /// highest.
    pub fn risk_score(&self, app: &App, permission: PermissionType) -> f64 {
        let factor = if self.is_required(app, permission) {
            FACTOR_REQUIRED
        } else if self.is_optional(app, permission) {
            FACTOR_OPTIONAL
        } else if app.trusted {
            FACTOR_SUSPICIOUS_TRUSTED
        } else {
            FACTOR_SUSPICIOUS_UNTRUSTED
        };
        (base_risk_weight(permission) * factor).clamp(10.0, 100.0)
    }

    pub fn risk_level(&self, score: f64) -> RiskLevel {
        RiskLevel::from_score(score)
    }

    /// Contextual warning text for a permission request. Always returns a
    /// string; required/optional requests get a reassurance, suspicious ones
    /// a per-permission privacy-risk explanation.
    pub fn warning_message(&self, app: &App, permission: PermissionType) -> String {
        let profile = self.profile(app);
        let category = profile.label.to_lowercase();

        if self.is_required(app, permission) {
            return format!("This {category} app requires this permission to function properly.");
        }
        if self.is_optional(app, permission) {
            return format!(
                "This {category} app may use this permission for additional features, \
                 but it's not strictly required."
            );
        }

        match permission {
            PermissionType::Location => format!(
                "This {category} app doesn't typically need location data to function properly. \
                 Sharing your location may allow the app to track your movements."
            ),
            PermissionType::Contacts => format!(
                "This {category} app doesn't normally require access to your contacts. \
                 Granting this permission could expose your personal network."
            ),
            PermissionType::FileAccess => format!(
                "This {category} app doesn't typically need access to your files. \
                 Granting this permission could allow access to your personal documents and media."
            ),
            PermissionType::CallLogs => format!(
                "This {category} app doesn't usually need your call history. \
                 Granting this permission could expose your communication patterns."
            ),
            PermissionType::Messages => format!(
                "This {category} app doesn't typically need access to your messages. \
                 Granting this permission could compromise private conversations."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str, name: &str, trusted: bool) -> App {
        App::new(id, name, "icon", trusted)
    }

    #[test]
    fn test_categorize_by_keywords() {
        let c = CategoryClassifier::new();
        assert_eq!(c.categorize(&app("nav1", "Maps Navigator", true)), AppCategory::Navigation);
        assert_eq!(c.categorize(&app("game1", "Puzzle Game", false)), AppCategory::Gaming);
        assert_eq!(c.categorize(&app("app3", "Photo Editor", true)), AppCategory::Photography);
        assert_eq!(c.categorize(&app("app1", "Social Connect", true)), AppCategory::Social);
        assert_eq!(c.categorize(&app("app5", "Weather Forecast", true)), AppCategory::Weather);
    }

    #[test]
    fn test_zero_score_defaults_to_utility() {
        let c = CategoryClassifier::new();
        assert_eq!(c.categorize(&app("app4", "Data Harvester", false)), AppCategory::Utility);
        assert_eq!(c.categorize(&app("x", "", true)), AppCategory::Utility);
    }

    #[test]
    fn test_tie_break_prefers_catalog_order() {
        // "map" votes navigation, "photo" votes photography: one keyword each,
        // so the earlier catalog entry (navigation) must win.
        let c = CategoryClassifier::new();
        assert_eq!(c.categorize(&app("x", "Map Photo", true)), AppCategory::Navigation);
    }

    #[test]
    fn test_partition_required_optional_suspicious() {
        let c = CategoryClassifier::new();
        let nav = app("nav1", "Maps Navigator", true);
        assert!(c.is_required(&nav, PermissionType::Location));
        assert!(!c.is_optional(&nav, PermissionType::Location));
        assert!(!c.is_suspicious(&nav, PermissionType::Location));

        assert!(c.is_optional(&nav, PermissionType::Contacts));
        assert!(c.is_suspicious(&nav, PermissionType::Messages));
        assert!(c.is_suspicious(&nav, PermissionType::CallLogs));
    }

    #[test]
    fn test_catalog_partition_never_overlaps() {
        for profile in CATALOG {
            for p in profile.required {
                assert!(
                    !profile.optional.contains(p),
                    "{} lists {p} as both required and optional",
                    profile.label
                );
            }
        }
    }

    #[test]
    fn test_required_scores_low_regardless_of_trust() {
        let c = CategoryClassifier::new();
        for trusted in [true, false] {
            let nav = app("nav1", "Maps Navigator", trusted);
            assert!(c.risk_score(&nav, PermissionType::Location) <= 30.0);
            let photo = app("p1", "Photo Gallery", trusted);
            assert!(c.risk_score(&photo, PermissionType::FileAccess) <= 30.0);
        }
    }

    #[test]
    fn test_suspicious_untrusted_scores_highest() {
        let c = CategoryClassifier::new();
        let trusted_game = app("game1", "Puzzle Game", true);
        let untrusted_game = app("game1", "Puzzle Game", false);
        // MESSAGES is suspicious for gaming.
        let t = c.risk_score(&trusted_game, PermissionType::Messages);
        let u = c.risk_score(&untrusted_game, PermissionType::Messages);
        assert!(u > t);
        assert_eq!(u, 100.0); // 85 * 1.2 clamps to 100
        assert_eq!(c.risk_level(u), RiskLevel::Critical);
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let c = CategoryClassifier::new();
        for trusted in [true, false] {
            let a = app("anything", "Anything", trusted);
            for p in PermissionType::ALL {
                let s = c.risk_score(&a, p);
                assert!((10.0..=100.0).contains(&s), "{p} scored {s}");
            }
        }
    }

    #[test]
    fn test_warning_message_names_category() {
        let c = CategoryClassifier::new();
        let game = app("game1", "Puzzle Game", false);
        let msg = c.warning_message(&game, PermissionType::Contacts);
        assert!(msg.contains("gaming"));
        assert!(msg.contains("contacts"));

        let nav = app("nav1", "Maps Navigator", true);
        let required = c.warning_message(&nav, PermissionType::Location);
        assert!(required.contains("requires this permission"));
    }
}
