use log::debug;
use wasm_bindgen::JsCast;
use web_sys::Element;

use super::types::{FamilyMember, NodeBox, PositionSnapshot};
use crate::error::AppError;

/// Attribute carrying a node's index into the member list.
pub const MEMBER_INDEX_ATTR: &str = "data-member-index";

/// Read where every rendered member node sits inside `container`.
///
/// Nodes that have no layout box yet (detached or `display: none`) are left
/// out, so their connectors are skipped until the next pass.
pub fn measure_positions(
	container: &Element,
	members: &[FamilyMember],
) -> Result<PositionSnapshot, AppError> {
	let origin = container.get_bounding_client_rect();
	let nodes = container
		.query_selector_all(&format!("[{MEMBER_INDEX_ATTR}]"))
		.map_err(AppError::dom)?;

	let mut snapshot = PositionSnapshot::default();
	for i in 0..nodes.length() {
		let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
			continue;
		};
		let Some(member) = el
			.get_attribute(MEMBER_INDEX_ATTR)
			.and_then(|raw| raw.parse::<usize>().ok())
			.and_then(|idx| members.get(idx))
		else {
			continue;
		};

		let rect = el.get_bounding_client_rect();
		if rect.width() <= 0.0 && rect.height() <= 0.0 {
			continue;
		}
		snapshot.insert(
			member.id.clone(),
			NodeBox {
				x: rect.left() - origin.left() + rect.width() / 2.0,
				y: rect.top() - origin.top() + rect.height() / 2.0,
				width: rect.width(),
				height: rect.height(),
			},
		);
	}

	debug!(
		"Measured {} of {} member nodes",
		snapshot.len(),
		members.len()
	);
	Ok(snapshot)
}
