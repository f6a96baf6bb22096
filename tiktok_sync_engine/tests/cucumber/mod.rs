mod fulfillment_steps;
mod order_steps;
mod sync_world;

pub use sync_world::SyncWorld;
