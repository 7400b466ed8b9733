mod hashing;
mod planner;
mod state;

pub use hashing::object::{
    HashingConfig, LinkKey, MaskConfig, MaskMode, ObjectKey, ObjectStateHasher, ObjectStateKey,
};
pub use hashing::{IdentityHasher, StateHasher};
pub use planner::affordance::{Affordance, AffordanceSet, Precondition};
pub use planner::backup::BellmanBackup;
pub use planner::cache::{
    ActionTransitions, CacheEntry, CachedTransition, Expansion, TransitionCache,
};
pub use planner::config::{ConfigError, PlannerConfig};
pub use planner::error::PlanError;
pub use planner::ids::{ActionId, StateIndex};
pub use planner::model::MdpModel;
pub use planner::policy::{ActionProb, GreedyPolicy, TieBreak};
pub use planner::reachability::{ExploreReport, ReachabilityExplorer};
pub use planner::snapshot::{ActionSnapshot, PlannerSnapshot, StateSnapshot, TransitionSnapshot};
pub use planner::transition::Transition;
pub use planner::value_iteration::{
    PlanReport, PlannerStatus, QValue, SweepControl, SweepMetrics, SweepOutcome, SweepReport,
    ValueIteration,
};
pub use planner::values::ValueTable;
pub use state::action::{ActionCatalog, ActionSchema, ObjectAction};
pub use state::error::StateError;
pub use state::object_state::{ObjectId, ObjectState};
pub use state::predicate::ObjectPredicate;
pub use state::schema::{ClassId, ObjectClass, Schema};
