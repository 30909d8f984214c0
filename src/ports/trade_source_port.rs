//! Authoritative (internal) trade source port.

use crate::domain::error::ReconError;
use crate::domain::trade::TradeRecord;

/// Supplies the left-hand, authoritative trade set. Network fetching lives
/// behind this trait, outside the core.
pub trait TradeSourcePort {
    fn fetch_trades(&self) -> Result<Vec<TradeRecord>, ReconError>;
}
