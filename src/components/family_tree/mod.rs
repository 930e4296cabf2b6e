//! Family tree view and the connector geometry behind it.

mod component;
mod geometry;
mod measure;
mod types;

pub use component::FamilyTreeDisplay;
pub use geometry::compute_connectors;
pub use measure::{MEMBER_INDEX_ATTR, measure_positions};
pub use types::{
	Connector, ConnectorKind, ConnectorStyle, FamilyMember, GridSpacing, MemberId, NodeBox, Point,
	PositionSnapshot, PositionSource,
};
