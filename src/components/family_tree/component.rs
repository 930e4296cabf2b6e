use leptos::ev;
use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::geometry::compute_connectors;
use super::measure::measure_positions;
use super::types::{Connector, ConnectorStyle, FamilyMember, GridSpacing};
use crate::error::AppError;

/// Wait after a data change before measuring again, so fonts and images in
/// freshly inserted nodes have settled.
const SETTLE_DELAY_MS: i32 = 150;
const ARROW_MARKER_ID: &str = "family-tree-arrow";
const AVATAR_SIZE: f64 = 56.0;
const AVATAR_TOP: f64 = 24.0;

/// Family tree: member nodes on a grid with an SVG connector overlay.
///
/// Connectors come from the nodes' measured positions and are recomputed
/// after mount, after each change to `members`, and on window resize.
#[component]
pub fn FamilyTreeDisplay(
	/// Members with their grid cells and relations.
	#[prop(into)]
	members: Signal<Vec<FamilyMember>>,
	/// Connector offsets; defaults fit the built-in avatar size.
	#[prop(optional)]
	connector_style: ConnectorStyle,
	/// Grid cell size.
	#[prop(optional)]
	grid: GridSpacing,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let connectors = RwSignal::new(Vec::<Connector>::new());

	// May fire from a timer after unmount, hence the try_ accessors.
	let relayout = move || {
		let Some(container) = container_ref.try_get_untracked().flatten() else {
			return;
		};
		let lines = members.try_with_untracked(|list| {
			measure_positions(&container, list)
				.map(|positions| compute_connectors(list, &positions, &connector_style))
				.map_err(|err| warn!("Skipping connector pass: {err}"))
				.ok()
		});
		if let Some(Some(lines)) = lines {
			let _ = connectors.try_set(lines);
		}
	};

	Effect::new(move |_| {
		members.track();
		relayout();
		schedule(relayout, SETTLE_DELAY_MS);
	});

	// The listener must go before the closure behind it is dropped.
	let resize = window_event_listener(ev::resize, move |_| relayout());
	on_cleanup(move || resize.remove());

	let extent = move || members.with(|list| grid.extent(list));

	view! {
		<div class="family-tree-scroll" style="overflow: auto; width: 100%;">
			<div
				node_ref=container_ref
				class="family-tree"
				style=move || {
					let (w, h) = extent();
					format!("position: relative; margin: 0 auto; width: {w}px; height: {h}px;")
				}
			>
				<svg
					class="family-tree-connectors"
					width=move || extent().0.to_string()
					height=move || extent().1.to_string()
					style="position: absolute; left: 0; top: 0; overflow: visible; pointer-events: none;"
				>
					<defs>
						<marker
							id=ARROW_MARKER_ID
							viewBox="0 0 10 10"
							refX="10"
							refY="5"
							markerWidth="6"
							markerHeight="6"
							orient="auto"
						>
							<path d="M 0 0 L 10 5 L 0 10 z" fill="#8a7f72" />
						</marker>
					</defs>
					{move || connectors.get().into_iter().map(connector_view).collect_view()}
				</svg>
				{move || {
					members
						.get()
						.into_iter()
						.enumerate()
						.map(|(index, member)| member_view(index, member, grid))
						.collect_view()
				}}
			</div>
		</div>
	}
}

fn connector_view(connector: Connector) -> AnyView {
	let class = connector.kind().css_class();
	match connector {
		Connector::Line { from, to, .. } => view! {
			<line
				class=class
				x1=from.x.to_string()
				y1=from.y.to_string()
				x2=to.x.to_string()
				y2=to.y.to_string()
				stroke="#8a7f72"
				stroke-width="2"
			/>
		}
		.into_any(),
		Connector::Path { arrow, .. } => {
			let marker = arrow.then(|| format!("url(#{ARROW_MARKER_ID})"));
			view! {
				<path
					class=class
					d=connector.svg_path_data()
					fill="none"
					stroke="#8a7f72"
					stroke-width="2"
					marker-end=marker
				/>
			}
			.into_any()
		}
	}
}

fn member_view(index: usize, member: FamilyMember, grid: GridSpacing) -> impl IntoView {
	let origin = grid.cell_origin(member.col, member.row);
	let name = member.label.unwrap_or_else(|| member.id.to_string());
	let initial: String = name.chars().take(1).flat_map(char::to_uppercase).collect();

	view! {
		<div
			class="family-member"
			style=format!(
				"position: absolute; left: {}px; top: {}px; width: {}px; display: flex; flex-direction: column; align-items: center;",
				origin.x,
				origin.y + AVATAR_TOP,
				grid.cell_width,
			)
		>
			<div
				class="family-member-avatar"
				data-member-index=index.to_string()
				style=format!(
					"width: {AVATAR_SIZE}px; height: {AVATAR_SIZE}px; border-radius: 50%; display: flex; align-items: center; justify-content: center;",
				)
			>
				{initial}
			</div>
			<span class="family-member-name">{name}</span>
		</div>
	}
}

fn schedule(task: impl FnOnce() + 'static, delay_ms: i32) {
	let Some(window): Option<Window> = web_sys::window() else {
		return;
	};
	let cb = Closure::once_into_js(task);
	let callback: &js_sys::Function = cb.unchecked_ref();
	if let Err(err) = window.set_timeout_with_callback_and_timeout_and_arguments_0(callback, delay_ms) {
		warn!("Could not schedule relayout: {}", AppError::dom(err));
	}
}
