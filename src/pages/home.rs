use leptos::prelude::*;
use serde_json::json;

use crate::components::comments::{Comment, CommentThread, comments_from_json};
use crate::components::family_tree::{FamilyMember, FamilyTreeDisplay};

/// Three generations laid out on the grid.
fn sample_family() -> Vec<FamilyMember> {
	vec![
		FamilyMember::new(1, 0, 0)
			.labeled("Grandpa Joe")
			.married_to(2)
			.with_children([3, 5]),
		FamilyMember::new(2, 1, 0)
			.labeled("Grandma Rose")
			.married_to(1)
			.with_children([3, 5]),
		FamilyMember::new(3, 0, 1)
			.labeled("Anna")
			.married_to(4)
			.with_children([6, 7, 8]),
		FamilyMember::new(4, 1, 1).labeled("Tom").married_to(3),
		FamilyMember::new(5, 2, 1).labeled("Uncle Ben"),
		FamilyMember::new(6, 0, 2).labeled("Lily"),
		FamilyMember::new(7, 1, 2).labeled("Max"),
		FamilyMember::new(8, 2, 2).labeled("Zoe"),
	]
}

/// Comments as the gallery endpoint returns them: flat, replies pointing up.
fn sample_comments() -> Vec<Comment> {
	comments_from_json(&json!([
		{"id": 101, "authorName": "Anna", "content": "Look at Grandpa's hat!"},
		{"id": 102, "parentCommentId": 101, "authorName": "Tom", "content": "Vintage 1974."},
		{"id": 103, "authorName": "Uncle Ben", "content": "Who took this one?"},
		{"id": 104, "parentCommentId": 102, "authorName": "Grandpa Joe", "content": "Still fits."},
		{"id": 105, "parentCommentId": 103, "authorName": "Grandma Rose", "content": "I did, at the lake."},
		{"id": 106, "parentCommentId": 101, "authorName": "Lily", "content": "I want one too"}
	]))
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let family = Signal::derive(sample_family);
	let comments = Signal::derive(sample_comments);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<main class="home">
				<h1>"Our Family"</h1>
				<FamilyTreeDisplay members=family />
				<h2>"Summer at the lake"</h2>
				<CommentThread comments=comments />
			</main>
		</ErrorBoundary>
	}
}
