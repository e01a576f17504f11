// Promotion Engine Module
//
// Decides which promotions are live, what they do to menu prices, when the
// restaurant is open, and how promotion impressions add up.
//
// Everything here except the snapshot cache and the rotation ticker is a pure
// function of its inputs; the current time always comes in through a Clock.

pub mod clock;
pub mod countdown;
pub mod eligibility;
pub mod error;
pub mod hours;
pub mod pricing;
pub mod reports;
pub mod rotation;
pub mod snapshot;
pub mod types;
pub mod window;

pub use clock::{Clock, FixedClock, RestaurantClock, SystemClock};
pub use countdown::{countdown, Countdown, CountdownView, TimeLeft};
pub use eligibility::{active_links, eligible, is_eligible, sort_for_display};
pub use error::{EngineError, EngineResult};
pub use hours::{is_open_at, DayHours, TimeOfDay, WeeklySchedule};
pub use pricing::{best_offer, compute_discounted_price, linked_item_prices, validate_discount, LinkedItemPrice, Offer};
pub use reports::{aggregate_views, build_report, PromotionViewStats, RankedPromotion, ViewReport};
pub use rotation::{PromotionRotation, RotationState, RotationTicker, DEFAULT_ROTATION_PERIOD};
pub use snapshot::{EligibilityCache, EligibleSet, DEFAULT_SNAPSHOT_TTL};
pub use types::{Discount, DiscountType};
pub use window::is_within_window;
