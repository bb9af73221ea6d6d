//! Module catalog - the declared curriculum.
//!
//! Modules form a total order (integer rank); each carries submodules
//! with a reflective prompt and a minimum word-count requirement the
//! caller uses when deciding completion.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ModuleId, SubmoduleId};

/// One reflective exercise inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submodule {
    pub id: SubmoduleId,
    pub title: String,
    /// The opening prompt shown when the submodule starts.
    pub prompt: String,
    /// Minimum words before the caller should mark completion.
    pub min_word_count: u32,
    pub order: u32,
}

/// One curriculum module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub title: String,
    pub description: String,
    /// Rank in the total module order; unlocking follows this.
    pub order: u32,
    pub submodules: Vec<Submodule>,
}

impl Module {
    /// Submodules sorted by their declared order.
    pub fn ordered_submodules(&self) -> Vec<&Submodule> {
        let mut subs: Vec<&Submodule> = self.submodules.iter().collect();
        subs.sort_by_key(|s| s.order);
        subs
    }

    /// Looks up a submodule by id.
    pub fn submodule(&self, id: &SubmoduleId) -> Option<&Submodule> {
        self.submodules.iter().find(|s| &s.id == id)
    }

    /// Declared submodule ids, in submodule order.
    pub fn submodule_ids(&self) -> Vec<SubmoduleId> {
        self.ordered_submodules()
            .into_iter()
            .map(|s| s.id.clone())
            .collect()
    }
}

/// The full ordered curriculum.
#[derive(Debug, Clone)]
pub struct ModuleCatalog {
    modules: Vec<Module>,
}

impl ModuleCatalog {
    /// Creates a catalog, sorting modules by rank.
    pub fn new(mut modules: Vec<Module>) -> Self {
        modules.sort_by_key(|m| m.order);
        Self { modules }
    }

    /// Creates the built-in default curriculum.
    pub fn with_defaults() -> Self {
        Self::new(default_modules())
    }

    /// All modules in rank order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Looks up a module by id.
    pub fn module(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.iter().find(|m| &m.id == id)
    }

    /// The first module in rank order (unlocked from the start).
    pub fn first(&self) -> Option<&Module> {
        self.modules.first()
    }

    /// The module that follows the given one in rank order.
    pub fn next_after(&self, id: &ModuleId) -> Option<&Module> {
        let idx = self.modules.iter().position(|m| &m.id == id)?;
        self.modules.get(idx + 1)
    }
}

impl Default for ModuleCatalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn submodule(id: &str, title: &str, prompt: &str, min_word_count: u32, order: u32) -> Submodule {
    Submodule {
        id: SubmoduleId::new(id).expect("static submodule id"),
        title: title.to_string(),
        prompt: prompt.to_string(),
        min_word_count,
        order,
    }
}

/// The built-in curriculum.
pub fn default_modules() -> Vec<Module> {
    vec![
        Module {
            id: ModuleId::new("introduction").expect("static module id"),
            title: "Introduction".to_string(),
            description: "Setting the stage for recovery".to_string(),
            order: 1,
            submodules: vec![
                submodule(
                    "welcome",
                    "Welcome to Your Recovery Journey",
                    "Take a moment to reflect on what brought you to this point. What does recovery mean to you right now?",
                    50,
                    1,
                ),
                submodule(
                    "goals",
                    "Your Recovery Goals",
                    "What are your hopes and goals for your recovery journey? What would you like to achieve?",
                    75,
                    2,
                ),
                submodule(
                    "support",
                    "Your Support System",
                    "Who are the people in your life who support your recovery? How do they help you?",
                    60,
                    3,
                ),
                submodule(
                    "commitment",
                    "Your Commitment",
                    "What are you willing to commit to in your recovery? What small steps can you take today?",
                    50,
                    4,
                ),
            ],
        },
        Module {
            id: ModuleId::new("awareness").expect("static module id"),
            title: "Building Awareness".to_string(),
            description: "Noticing patterns without judgment".to_string(),
            order: 2,
            submodules: vec![
                submodule(
                    "noticing",
                    "Noticing Your Patterns",
                    "Think about the past week. When did difficult feelings show up, and what was happening around you?",
                    60,
                    1,
                ),
                submodule(
                    "body-signals",
                    "Listening to Your Body",
                    "What signals does your body send you during hard moments? How do you usually respond to them?",
                    60,
                    2,
                ),
            ],
        },
    ]
}
