use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// Family member key.
pub type MemberId = RecordId;

/// A member placed on the tree grid. `col`/`row` come from the layout step
/// upstream; connectors are drawn from measured positions, not from these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
	/// Unique within one tree.
	pub id: MemberId,
	/// Display name; the id is shown when absent.
	#[serde(default)]
	pub label: Option<String>,
	/// Partner, if any.
	#[serde(default)]
	pub spouse_id: Option<MemberId>,
	/// Children in display order.
	#[serde(default)]
	pub children_ids: Vec<MemberId>,
	/// Grid column.
	#[serde(default)]
	pub col: u32,
	/// Grid row, one per generation.
	#[serde(default)]
	pub row: u32,
}

impl FamilyMember {
	/// Member at `col`/`row` with no relations.
	pub fn new(id: impl Into<MemberId>, col: u32, row: u32) -> Self {
		Self {
			id: id.into(),
			label: None,
			spouse_id: None,
			children_ids: Vec::new(),
			col,
			row,
		}
	}

	/// Builder-style display name.
	pub fn labeled(mut self, label: &str) -> Self {
		self.label = Some(label.to_owned());
		self
	}

	/// Builder-style spouse.
	pub fn married_to(mut self, spouse: impl Into<MemberId>) -> Self {
		self.spouse_id = Some(spouse.into());
		self
	}

	/// Builder-style children, in order.
	pub fn with_children<I, T>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<MemberId>,
	{
		self.children_ids = children.into_iter().map(Into::into).collect();
		self
	}
}

/// Pixel coordinate inside the tree container.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Pixels from the left edge.
	pub x: f64,
	/// Pixels from the top edge.
	pub y: f64,
}

impl Point {
	/// Point at `x`, `y`.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Rendered box of a member node. `x`/`y` is the center, relative to the
/// tree container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeBox {
	/// Center x.
	pub x: f64,
	/// Center y.
	pub y: f64,
	/// Rendered width.
	pub width: f64,
	/// Rendered height.
	pub height: f64,
}

impl NodeBox {
	/// Center as a point.
	pub fn center(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

/// Where members currently are on screen.
pub trait PositionSource {
	/// `None` when the member is not rendered (yet).
	fn position_of(&self, id: &MemberId) -> Option<NodeBox>;
}

impl<F> PositionSource for F
where
	F: Fn(&MemberId) -> Option<NodeBox>,
{
	fn position_of(&self, id: &MemberId) -> Option<NodeBox> {
		self(id)
	}
}

/// Positions read once per layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionSnapshot(HashMap<MemberId, NodeBox>);

impl PositionSnapshot {
	/// Record (or replace) a member's box.
	pub fn insert(&mut self, id: MemberId, node: NodeBox) {
		self.0.insert(id, node);
	}

	/// Members with a known position.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Nothing measured.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl FromIterator<(MemberId, NodeBox)> for PositionSnapshot {
	fn from_iter<I: IntoIterator<Item = (MemberId, NodeBox)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl PositionSource for PositionSnapshot {
	fn position_of(&self, id: &MemberId) -> Option<NodeBox> {
		self.0.get(id).copied()
	}
}

/// What a connector links; drives its CSS class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
	/// Between two spouses.
	Spouse,
	/// Short drop below a parent (or couple) down to the branch.
	Trunk,
	/// Horizontal line across all children.
	Branch,
	/// From the branch down to one child.
	Child,
}

impl ConnectorKind {
	/// Classes set on the SVG element.
	pub fn css_class(self) -> &'static str {
		match self {
			ConnectorKind::Spouse => "connector connector-spouse",
			ConnectorKind::Trunk => "connector connector-trunk",
			ConnectorKind::Branch => "connector connector-branch",
			ConnectorKind::Child => "connector connector-child",
		}
	}
}

/// One drawable piece of the tree overlay.
#[derive(Clone, Debug, PartialEq)]
pub enum Connector {
	/// Straight segment.
	Line {
		/// What it links.
		kind: ConnectorKind,
		/// Start point.
		from: Point,
		/// End point.
		to: Point,
	},
	/// Polyline through `points`.
	Path {
		/// What it links.
		kind: ConnectorKind,
		/// Vertices, in drawing order.
		points: Vec<Point>,
		/// Draw an arrowhead at the last point.
		arrow: bool,
	},
}

impl Connector {
	/// What this connector links.
	pub fn kind(&self) -> ConnectorKind {
		match self {
			Connector::Line { kind, .. } | Connector::Path { kind, .. } => *kind,
		}
	}

	/// SVG `d` attribute for this connector.
	pub fn svg_path_data(&self) -> String {
		let points = match self {
			Connector::Line { from, to, .. } => vec![*from, *to],
			Connector::Path { points, .. } => points.clone(),
		};
		points
			.iter()
			.enumerate()
			.map(|(i, p)| format!("{} {} {}", if i == 0 { 'M' } else { 'L' }, p.x, p.y))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

/// Pixel offsets used when deriving connectors from node centers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectorStyle {
	/// Below a center to the bottom of the avatar; spouse lines hang here.
	pub spouse_offset: f64,
	/// Below a parent's center to clear its name label; trunks start here.
	pub label_offset: f64,
	/// Length of the trunk down to the children's branch.
	pub branch_drop: f64,
	/// Gap left above a child's center where its drop ends.
	pub child_clearance: f64,
	/// Mark child drops for an arrowhead.
	pub child_arrows: bool,
}

impl Default for ConnectorStyle {
	fn default() -> Self {
		Self {
			spouse_offset: 30.0,
			label_offset: 50.0,
			branch_drop: 20.0,
			child_clearance: 40.0,
			child_arrows: true,
		}
	}
}

/// Pixel size of one grid cell in the tree layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpacing {
	/// Column width.
	pub cell_width: f64,
	/// Row height.
	pub cell_height: f64,
}

impl Default for GridSpacing {
	fn default() -> Self {
		Self {
			cell_width: 160.0,
			cell_height: 180.0,
		}
	}
}

impl GridSpacing {
	/// Top-left corner of the cell at `col`/`row`.
	pub fn cell_origin(&self, col: u32, row: u32) -> Point {
		Point::new(col as f64 * self.cell_width, row as f64 * self.cell_height)
	}

	/// Container size needed to hold every member.
	pub fn extent(&self, members: &[FamilyMember]) -> (f64, f64) {
		let cols = members.iter().map(|m| m.col + 1).max().unwrap_or(0);
		let rows = members.iter().map(|m| m.row + 1).max().unwrap_or(0);
		(
			cols as f64 * self.cell_width,
			rows as f64 * self.cell_height,
		)
	}
}
