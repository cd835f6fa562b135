//! Fixed badge catalog
//!
//! Badge definitions live in code, in the same order the evaluator
//! checks their unlock conditions. The database only records which
//! badge IDs a user has unlocked; display metadata is resolved here.

use serde::Serialize;

/// One achievement badge definition
#[derive(Serialize, Clone, Debug)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Every badge the tracker can award, in evaluation order
pub const BADGES: &[Badge] = &[
    Badge {
        id: "technique_starter",
        name: "First Picks",
        description: "Complete your first technique lesson",
        icon: "🎸",
    },
    Badge {
        id: "technique_graduate",
        name: "Technique Graduate",
        description: "Complete five technique lessons",
        icon: "🎓",
    },
    Badge {
        id: "technique_master",
        name: "Technique Master",
        description: "Complete the entire technique series",
        icon: "🏆",
    },
    Badge {
        id: "theory_starter",
        name: "Theory Curious",
        description: "Complete your first theory lesson",
        icon: "📖",
    },
    Badge {
        id: "theory_graduate",
        name: "Theory Graduate",
        description: "Complete five theory lessons",
        icon: "🎼",
    },
    Badge {
        id: "theory_master",
        name: "Theory Master",
        description: "Complete the entire theory series",
        icon: "🧠",
    },
    Badge {
        id: "ghost_complete",
        name: "Ghost Hunter",
        description: "Complete the full GHOST song series",
        icon: "👻",
    },
    Badge {
        id: "dinner_complete",
        name: "Dinner Song Chef",
        description: "Complete the full dinner-song series",
        icon: "🍜",
    },
    Badge {
        id: "streak_3",
        name: "Warming Up",
        description: "Practice three days in a row",
        icon: "🔥",
    },
    Badge {
        id: "streak_7",
        name: "One Week Strong",
        description: "Practice seven days in a row",
        icon: "⚡",
    },
    Badge {
        id: "streak_30",
        name: "Shed Resident",
        description: "Practice thirty days in a row",
        icon: "🌟",
    },
    Badge {
        id: "all_series",
        name: "Complete Player",
        description: "Finish every lesson series",
        icon: "👑",
    },
];

/// Look up a badge definition by its ID
pub fn badge_by_id(id: &str) -> Option<&'static Badge> {
    BADGES.iter().find(|b| b.id == id)
}
