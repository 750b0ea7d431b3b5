// SPDX-License-Identifier: MIT

//! Static gamification catalog: tasks and the vibe palette.
//!
//! The catalog is fixed at compile time. Task ids arriving over the wire
//! are parsed into [`TaskId`] at the boundary; everything past the boundary
//! works with known keys only.

use serde::Serialize;

/// A gamification task users can complete for points.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub title: &'static str,
    pub description: &'static str,
    pub points: u32,
    pub repeatable: bool,
    pub require_proof: bool,
    /// Natural-language prompt sent to the image classifier for
    /// proof-gated tasks.
    #[serde(skip)]
    pub proof_prompt: Option<&'static str>,
}

/// Identifier of a task in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskId {
    #[serde(rename = "SIGN_UP")]
    SignUp,
    #[serde(rename = "CREATE_JAM")]
    CreateJam,
    #[serde(rename = "ATTEND_JAM")]
    AttendJam,
    #[serde(rename = "RIDE_TOKTOK")]
    RideToktok,
    #[serde(rename = "VISIT_TEA_PLANTATION")]
    VisitTeaPlantation,
    #[serde(rename = "HAVE_FISH_CURRY")]
    HaveFishCurry,
    #[serde(rename = "WHALE_WATCHING")]
    WhaleWatching,
    #[serde(rename = "PICTURE_WITH_MONKEY")]
    PictureWithMonkey,
    #[serde(rename = "LEARN_TO_SURF")]
    LearnToSurf,
    #[serde(rename = "MORNING_WRITING")]
    MorningWriting,
}

impl TaskId {
    /// Wire/storage form of the id (also the key in `completed_tasks`).
    pub fn as_str(self) -> &'static str {
        match self {
            TaskId::SignUp => "SIGN_UP",
            TaskId::CreateJam => "CREATE_JAM",
            TaskId::AttendJam => "ATTEND_JAM",
            TaskId::RideToktok => "RIDE_TOKTOK",
            TaskId::VisitTeaPlantation => "VISIT_TEA_PLANTATION",
            TaskId::HaveFishCurry => "HAVE_FISH_CURRY",
            TaskId::WhaleWatching => "WHALE_WATCHING",
            TaskId::PictureWithMonkey => "PICTURE_WITH_MONKEY",
            TaskId::LearnToSurf => "LEARN_TO_SURF",
            TaskId::MorningWriting => "MORNING_WRITING",
        }
    }

    /// Parse a wire id. Unknown ids are a boundary validation failure.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "SIGN_UP" => Some(TaskId::SignUp),
            "CREATE_JAM" => Some(TaskId::CreateJam),
            "ATTEND_JAM" => Some(TaskId::AttendJam),
            "RIDE_TOKTOK" => Some(TaskId::RideToktok),
            "VISIT_TEA_PLANTATION" => Some(TaskId::VisitTeaPlantation),
            "HAVE_FISH_CURRY" => Some(TaskId::HaveFishCurry),
            "WHALE_WATCHING" => Some(TaskId::WhaleWatching),
            "PICTURE_WITH_MONKEY" => Some(TaskId::PictureWithMonkey),
            "LEARN_TO_SURF" => Some(TaskId::LearnToSurf),
            "MORNING_WRITING" => Some(TaskId::MorningWriting),
            _ => None,
        }
    }

    /// Look up the catalog entry for this id.
    pub fn task(self) -> &'static Task {
        &TASKS[self as usize]
    }
}

/// The full task catalog, indexed by `TaskId as usize`.
pub static TASKS: &[Task] = &[
    Task {
        id: TaskId::SignUp,
        title: "Welcome to the Jelloverse!",
        description: "Create your account and profile",
        points: 10,
        repeatable: false,
        require_proof: false,
        proof_prompt: None,
    },
    Task {
        id: TaskId::CreateJam,
        title: "Jam Creator",
        description: "Create a jam",
        points: 10,
        repeatable: true,
        require_proof: false,
        proof_prompt: None,
    },
    Task {
        id: TaskId::AttendJam,
        title: "Jiggle Time!",
        description: "Attend a jam. The more you attend, the more \u{2b50} you earn!",
        points: 10,
        repeatable: true,
        require_proof: false,
        proof_prompt: None,
    },
    Task {
        id: TaskId::RideToktok,
        title: "TukTuk Rider",
        description: "Ride a TukTuk",
        points: 10,
        repeatable: false,
        require_proof: true,
        proof_prompt: Some(
            "Is this a photo of someone riding or sitting in a tuk-tuk/auto-rickshaw? \
             The photo should clearly show someone inside a tuk-tuk or auto-rickshaw. \
             Please respond with just 'true' or 'false'.",
        ),
    },
    Task {
        id: TaskId::VisitTeaPlantation,
        title: "Tea Time",
        description: "Visit a tea plantation",
        points: 10,
        repeatable: false,
        require_proof: true,
        proof_prompt: Some(
            "Is this a photo of someone visiting a tea plantation? The photo should \
             clearly show someone in a tea plantation, interacting with tea plants, \
             tea trees, or tea leaves, or drinking tea. Please respond with just \
             'true' or 'false'.",
        ),
    },
    Task {
        id: TaskId::HaveFishCurry,
        title: "Curry Connoisseur",
        description: "Have a fish curry",
        points: 10,
        repeatable: false,
        require_proof: true,
        proof_prompt: Some(
            "Is this a photo of someone eating fish curry? The photo should clearly \
             show someone eating fish curry. Please respond with just 'true' or 'false'.",
        ),
    },
    Task {
        id: TaskId::WhaleWatching,
        title: "Whale Hello There",
        description: "Go whale watching",
        points: 10,
        repeatable: false,
        require_proof: true,
        proof_prompt: Some(
            "Is this a photo of someone whale watching? The photo should clearly show \
             someone whale watching or interacting with whales or just a picture of a \
             whale. Please respond with just 'true' or 'false'.",
        ),
    },
    Task {
        id: TaskId::PictureWithMonkey,
        title: "Monkey Business",
        description: "Take a picture with a monkey",
        points: 10,
        repeatable: false,
        require_proof: true,
        proof_prompt: Some(
            "Is this a photo of someone with a monkey? The photo should clearly show \
             someone with a monkey. Please respond with just 'true' or 'false'.",
        ),
    },
    Task {
        id: TaskId::LearnToSurf,
        title: "Surf's Up",
        description: "Learn to surf",
        points: 10,
        repeatable: false,
        require_proof: true,
        proof_prompt: Some(
            "Is this a photo of someone learning to surf? The photo should clearly \
             show someone learning to surf, surfing, or it should show someone with a \
             surf board on the beach. Please respond with just 'true' or 'false'.",
        ),
    },
    Task {
        id: TaskId::MorningWriting,
        title: "Morning Pages",
        description: "Join a morning writing group",
        points: 10,
        repeatable: false,
        require_proof: true,
        proof_prompt: Some(
            "Is this a photo of someone at a morning writing group? It could be a \
             picture of a piece of writing, or a group picture of people that seem to \
             be in a writing session. Please respond with just 'true' or 'false'.",
        ),
    },
];

/// Fixed palette of vibe tags for profiles and events.
pub const VIBE_PALETTE: &[&str] = &[
    "\u{1f389}",             // 🎉 Party
    "\u{1f344}",             // 🍄 Psychedelics
    "\u{1f3c4}\u{200d}\u{2642}\u{fe0f}", // 🏄‍♂️ Surf
    "\u{1f3d6}\u{fe0f}",     // 🏖️ Beach
    "\u{1f35c}",             // 🍜 Food
    "\u{1f37a}",             // 🍺 Drinks
    "\u{1f9d8}\u{200d}\u{2640}\u{fe0f}", // 🧘‍♀️ Meditation
    "\u{1f3a8}",             // 🎨 Art
];

/// Maximum number of vibes a profile may carry.
pub const MAX_VIBES: usize = 3;

/// Whether a vibe tag belongs to the fixed palette.
pub fn is_known_vibe(vibe: &str) -> bool {
    VIBE_PALETTE.contains(&vibe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_indexed_by_task_id() {
        for task in TASKS {
            assert_eq!(task.id.task().id, task.id);
            assert_eq!(TaskId::parse(task.id.as_str()), Some(task.id));
        }
    }

    #[test]
    fn test_unknown_id_rejected() {
        assert_eq!(TaskId::parse("EAT_JELLO"), None);
        assert_eq!(TaskId::parse(""), None);
        assert_eq!(TaskId::parse("sign_up"), None);
    }

    #[test]
    fn test_proof_tasks_carry_prompts() {
        for task in TASKS {
            assert_eq!(task.require_proof, task.proof_prompt.is_some());
        }
    }

    #[test]
    fn test_vibe_palette() {
        assert!(is_known_vibe("\u{1f389}"));
        assert!(!is_known_vibe("\u{1f480}"));
        assert_eq!(MAX_VIBES, 3);
    }
}
