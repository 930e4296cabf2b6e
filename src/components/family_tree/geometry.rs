use std::collections::HashSet;

use log::debug;

use super::types::{
	Connector, ConnectorKind, ConnectorStyle, FamilyMember, MemberId, NodeBox, Point,
	PositionSource,
};

type CoupleKey<'a> = (&'a MemberId, &'a MemberId);

fn couple_key<'a>(a: &'a MemberId, b: &'a MemberId) -> CoupleKey<'a> {
	if a <= b { (a, b) } else { (b, a) }
}

/// Derive the connector overlay for `members` from their current positions.
///
/// Members and children without a position are skipped. Each spouse pair is
/// joined once, and a couple that both list the same children gets a single
/// trunk/branch group. All bookkeeping is local to the call.
pub fn compute_connectors<P>(
	members: &[FamilyMember],
	positions: &P,
	style: &ConnectorStyle,
) -> Vec<Connector>
where
	P: PositionSource + ?Sized,
{
	let present: HashSet<&MemberId> = members.iter().map(|m| &m.id).collect();
	let mut joined: HashSet<CoupleKey> = HashSet::new();
	let mut families: HashSet<(CoupleKey, Vec<&MemberId>)> = HashSet::new();
	let mut out = Vec::new();

	for member in members {
		let Some(own) = positions.position_of(&member.id) else {
			continue;
		};

		let spouse = member
			.spouse_id
			.as_ref()
			.filter(|s| present.contains(s));
		let spouse_box = spouse.and_then(|s| positions.position_of(s));

		if let (Some(spouse_id), Some(other)) = (spouse, spouse_box) {
			if joined.insert(couple_key(&member.id, spouse_id)) {
				out.push(Connector::Line {
					kind: ConnectorKind::Spouse,
					from: Point::new(own.x, own.y + style.spouse_offset),
					to: Point::new(other.x, other.y + style.spouse_offset),
				});
			}
		}

		if member.children_ids.is_empty() {
			continue;
		}

		let couple = match spouse {
			Some(spouse_id) => couple_key(&member.id, spouse_id),
			None => (&member.id, &member.id),
		};
		let mut kin: Vec<&MemberId> = member.children_ids.iter().collect();
		kin.sort();
		if !families.insert((couple, kin)) {
			continue;
		}

		push_children(&mut out, member, own, spouse_box, positions, style);
	}

	debug!(
		"Computed {} connectors for {} members",
		out.len(),
		members.len()
	);
	out
}

fn push_children<P>(
	out: &mut Vec<Connector>,
	parent: &FamilyMember,
	own: NodeBox,
	spouse: Option<NodeBox>,
	positions: &P,
	style: &ConnectorStyle,
) where
	P: PositionSource + ?Sized,
{
	let anchor_x = spouse.map_or(own.x, |other| (own.x + other.x) / 2.0);
	let anchor_y = own.y + style.label_offset;
	let branch_y = anchor_y + style.branch_drop;

	out.push(Connector::Line {
		kind: ConnectorKind::Trunk,
		from: Point::new(anchor_x, anchor_y),
		to: Point::new(anchor_x, branch_y),
	});

	let children: Vec<NodeBox> = parent
		.children_ids
		.iter()
		.filter_map(|id| positions.position_of(id))
		.collect();
	if children.is_empty() {
		return;
	}

	// A single child still gets its (zero-length) branch.
	let (min_x, max_x) = children
		.iter()
		.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
			(lo.min(c.x), hi.max(c.x))
		});
	out.push(Connector::Line {
		kind: ConnectorKind::Branch,
		from: Point::new(min_x, branch_y),
		to: Point::new(max_x, branch_y),
	});

	out.extend(children.iter().map(|child| Connector::Path {
		kind: ConnectorKind::Child,
		points: vec![
			Point::new(child.x, branch_y),
			Point::new(child.x, child.y - style.child_clearance),
		],
		arrow: style.child_arrows,
	}));
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::family_tree::types::PositionSnapshot;

	fn at(x: f64, y: f64) -> NodeBox {
		NodeBox {
			x,
			y,
			width: 80.0,
			height: 100.0,
		}
	}

	fn snapshot(entries: &[(i64, f64, f64)]) -> PositionSnapshot {
		entries
			.iter()
			.map(|&(id, x, y)| (MemberId::from(id), at(x, y)))
			.collect()
	}

	fn of_kind(connectors: &[Connector], kind: ConnectorKind) -> Vec<&Connector> {
		connectors.iter().filter(|c| c.kind() == kind).collect()
	}

	#[test]
	fn spouse_pair_is_joined_once() {
		let members = [
			FamilyMember::new(1, 0, 0).married_to(2),
			FamilyMember::new(2, 1, 0).married_to(1),
		];
		let positions = snapshot(&[(1, 100.0, 50.0), (2, 260.0, 50.0)]);
		let style = ConnectorStyle::default();
		let connectors = compute_connectors(&members, &positions, &style);

		assert_eq!(
			connectors,
			vec![Connector::Line {
				kind: ConnectorKind::Spouse,
				from: Point::new(100.0, 50.0 + style.spouse_offset),
				to: Point::new(260.0, 50.0 + style.spouse_offset),
			}]
		);
	}

	#[test]
	fn unresolved_child_is_skipped() {
		let members = [FamilyMember::new(1, 0, 0).with_children([10, 11])];
		let positions = snapshot(&[(1, 100.0, 50.0), (10, 40.0, 230.0)]);
		let style = ConnectorStyle::default();
		let connectors = compute_connectors(&members, &positions, &style);

		let branch_y = 50.0 + style.label_offset + style.branch_drop;
		assert_eq!(of_kind(&connectors, ConnectorKind::Trunk).len(), 1);
		assert_eq!(
			of_kind(&connectors, ConnectorKind::Branch),
			vec![&Connector::Line {
				kind: ConnectorKind::Branch,
				from: Point::new(40.0, branch_y),
				to: Point::new(40.0, branch_y),
			}]
		);
		assert_eq!(
			of_kind(&connectors, ConnectorKind::Child),
			vec![&Connector::Path {
				kind: ConnectorKind::Child,
				points: vec![
					Point::new(40.0, branch_y),
					Point::new(40.0, 230.0 - style.child_clearance)
				],
				arrow: true,
			}]
		);
	}

	#[test]
	fn no_relationships_no_connectors() {
		let members = [FamilyMember::new(1, 0, 0), FamilyMember::new(2, 1, 0)];
		let positions = snapshot(&[(1, 0.0, 0.0), (2, 160.0, 0.0)]);
		assert!(compute_connectors(&members, &positions, &ConnectorStyle::default()).is_empty());
	}

	#[test]
	fn couple_children_hang_from_midpoint() {
		let members = [
			FamilyMember::new(1, 0, 0).married_to(2).with_children([3, 4]),
			FamilyMember::new(2, 1, 0).married_to(1).with_children([4, 3]),
			FamilyMember::new(3, 0, 1),
			FamilyMember::new(4, 1, 1),
		];
		let positions = snapshot(&[
			(1, 80.0, 60.0),
			(2, 240.0, 60.0),
			(3, 80.0, 240.0),
			(4, 240.0, 240.0),
		]);
		let style = ConnectorStyle::default();
		let connectors = compute_connectors(&members, &positions, &style);

		assert_eq!(of_kind(&connectors, ConnectorKind::Spouse).len(), 1);
		assert_eq!(
			of_kind(&connectors, ConnectorKind::Trunk),
			vec![&Connector::Line {
				kind: ConnectorKind::Trunk,
				from: Point::new(160.0, 60.0 + style.label_offset),
				to: Point::new(160.0, 60.0 + style.label_offset + style.branch_drop),
			}]
		);
		assert_eq!(of_kind(&connectors, ConnectorKind::Branch).len(), 1);
		assert_eq!(of_kind(&connectors, ConnectorKind::Child).len(), 2);
	}

	#[test]
	fn spouses_with_different_children_draw_both() {
		let members = [
			FamilyMember::new(1, 0, 0).married_to(2).with_children([3]),
			FamilyMember::new(2, 1, 0).married_to(1).with_children([4]),
		];
		let positions = snapshot(&[
			(1, 0.0, 0.0),
			(2, 100.0, 0.0),
			(3, 0.0, 200.0),
			(4, 100.0, 200.0),
		]);
		let connectors = compute_connectors(&members, &positions, &ConnectorStyle::default());
		assert_eq!(of_kind(&connectors, ConnectorKind::Trunk).len(), 2);
		assert_eq!(of_kind(&connectors, ConnectorKind::Child).len(), 2);
	}

	#[test]
	fn unrendered_members_are_ignored() {
		let members = [
			FamilyMember::new(1, 0, 0).married_to(2).with_children([3]),
			FamilyMember::new(2, 1, 0).married_to(1),
			FamilyMember::new(3, 0, 1).married_to(99),
		];
		// Spouse 2 not rendered: no spouse line, trunk hangs from 1 alone.
		let positions = snapshot(&[(1, 50.0, 0.0), (3, 50.0, 200.0), (99, 0.0, 0.0)]);
		let style = ConnectorStyle::default();
		let connectors = compute_connectors(&members, &positions, &style);

		// 99 is positioned but not a member, so 3 gets no spouse line either.
		assert!(of_kind(&connectors, ConnectorKind::Spouse).is_empty());
		match of_kind(&connectors, ConnectorKind::Trunk)[..] {
			[Connector::Line { from, .. }] => assert_eq!(from.x, 50.0),
			ref other => panic!("unexpected trunks: {other:?}"),
		}
	}

	#[test]
	fn parent_without_rendered_children_keeps_trunk() {
		let members = [FamilyMember::new(1, 0, 0).with_children([2])];
		let positions = snapshot(&[(1, 0.0, 0.0)]);
		let connectors = compute_connectors(&members, &positions, &ConnectorStyle::default());
		assert_eq!(connectors.len(), 1);
		assert_eq!(connectors[0].kind(), ConnectorKind::Trunk);
	}

	#[test]
	fn origin_is_a_real_position() {
		let members = [FamilyMember::new(1, 0, 0).with_children([2])];
		let positions = snapshot(&[(1, 0.0, 0.0), (2, 0.0, 200.0)]);
		let connectors = compute_connectors(&members, &positions, &ConnectorStyle::default());
		assert_eq!(of_kind(&connectors, ConnectorKind::Child).len(), 1);
	}

	#[test]
	fn repeated_passes_agree() {
		let members = [
			FamilyMember::new("a", 0, 0).married_to("b").with_children(["c"]),
			FamilyMember::new("b", 1, 0).married_to("a"),
			FamilyMember::new("c", 0, 1),
		];
		let oracle = |id: &MemberId| match id.to_string().as_str() {
			"a" => Some(at(0.0, 0.0)),
			"b" => Some(at(160.0, 0.0)),
			"c" => Some(at(80.0, 180.0)),
			_ => None,
		};
		let style = ConnectorStyle {
			child_arrows: false,
			..ConnectorStyle::default()
		};
		let first = compute_connectors(&members, &oracle, &style);
		let second = compute_connectors(&members, &oracle, &style);

		assert_eq!(first, second);
		assert_eq!(first.len(), 4);
		assert!(matches!(
			first.last(),
			Some(Connector::Path { arrow: false, .. })
		));
	}

	#[test]
	fn own_spouse_gets_a_point_line() {
		let members = [FamilyMember::new(1, 0, 0).married_to(1).with_children([2])];
		let positions = snapshot(&[(1, 100.0, 40.0), (2, 100.0, 220.0)]);
		let style = ConnectorStyle::default();
		let connectors = compute_connectors(&members, &positions, &style);

		let below = Point::new(100.0, 40.0 + style.spouse_offset);
		assert_eq!(
			of_kind(&connectors, ConnectorKind::Spouse),
			vec![&Connector::Line {
				kind: ConnectorKind::Spouse,
				from: below,
				to: below,
			}]
		);
		match of_kind(&connectors, ConnectorKind::Trunk)[..] {
			[Connector::Line { from, .. }] => assert_eq!(from.x, 100.0),
			ref other => panic!("unexpected trunks: {other:?}"),
		}
	}
}
