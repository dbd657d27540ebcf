use flowlib_domain::{Category, IntegrationSummary, Source, TriggerType, WorkflowRecord};

/// A record with neutral defaults; tests override the fields they care about.
pub fn workflow(slug: &str, name: &str) -> WorkflowRecord {
	WorkflowRecord {
		id: format!("id-{slug}"),
		slug: slug.to_string(),
		name: name.to_string(),
		description: String::new(),
		category: "misc".to_string(),
		category_name: "Miscellaneous".to_string(),
		category_icon: "box".to_string(),
		source: Source::Community,
		quality: 3,
		node_count: 1,
		integrations: Vec::new(),
		trigger_type: TriggerType::Manual,
		created_at: "2024-01-01T00:00:00Z".to_string(),
	}
}

#[allow(clippy::too_many_arguments)]
fn scenario_record(
	slug: &str,
	name: &str,
	description: &str,
	quality: u8,
	source: Source,
	ai: bool,
	node_count: u32,
	integrations: &[&str],
	trigger_type: TriggerType,
	created_at: &str,
) -> WorkflowRecord {
	let (category, category_name, category_icon) =
		if ai { ("ai", "AI", "sparkles") } else { ("comm", "Communication", "message") };

	WorkflowRecord {
		id: format!("id-{slug}"),
		slug: slug.to_string(),
		name: name.to_string(),
		description: description.to_string(),
		category: category.to_string(),
		category_name: category_name.to_string(),
		category_icon: category_icon.to_string(),
		source,
		quality,
		node_count,
		integrations: integrations.iter().map(|slug| slug.to_string()).collect(),
		trigger_type,
		created_at: created_at.to_string(),
	}
}

/// Five records A-E: A(5, awesome, ai), B(3, community, ai), C(5, community, comm),
/// D(2, community, comm), E(4, awesome, ai). Names sort alphabetically A-E.
pub fn scenario_corpus() -> Vec<WorkflowRecord> {
	vec![
		scenario_record(
			"a-ticket-tagger",
			"Auto-tag support tickets",
			"Classifies incoming helpdesk tickets with an LLM and labels them.",
			5,
			Source::Awesome,
			true,
			8,
			&["openai", "zendesk"],
			TriggerType::Webhook,
			"2024-02-10T09:00:00Z",
		),
		scenario_record(
			"b-blog-drafts",
			"Blog post drafting",
			"Turns outlines into long-form drafts stored in Notion.",
			3,
			Source::Community,
			true,
			5,
			&["openai", "notion"],
			TriggerType::Manual,
			"2024-05-01T12:00:00Z",
		),
		scenario_record(
			"c-chat-digest",
			"Chat digest to Slack",
			"Summarizes channel activity into a morning digest.",
			5,
			Source::Community,
			false,
			12,
			&["slack"],
			TriggerType::Schedule,
			"2023-11-20T08:30:00Z",
		),
		scenario_record(
			"d-standup-reminder",
			"Daily standup reminder",
			"Pings the team on Discord before the standup meeting.",
			2,
			Source::Community,
			false,
			2,
			&["discord"],
			TriggerType::Schedule,
			"not-a-timestamp",
		),
		scenario_record(
			"e-invoice-router",
			"Expense invoice router",
			"Extracts totals from PDF invoices and files them in Google Sheets.",
			4,
			Source::Awesome,
			true,
			15,
			&["google-sheets", "gmail"],
			TriggerType::Event,
			"2024-05-01T12:00:00Z",
		),
	]
}

pub fn categories() -> Vec<Category> {
	vec![
		Category {
			slug: "ai".to_string(),
			name: "AI".to_string(),
			icon: "sparkles".to_string(),
			color: "cat-ai".to_string(),
			description: "Workflows built around language models.".to_string(),
			count: 3,
		},
		Category {
			slug: "comm".to_string(),
			name: "Communication".to_string(),
			icon: "message".to_string(),
			color: "cat-comm".to_string(),
			description: "Chat, email, and notification flows.".to_string(),
			count: 2,
		},
	]
}

pub fn integrations() -> Vec<IntegrationSummary> {
	["openai", "slack"]
		.into_iter()
		.map(|slug| IntegrationSummary {
			slug: slug.to_string(),
			name: slug.to_string(),
			icon: slug.to_string(),
			icon_type: "simple-icons".to_string(),
			icon_url: None,
			count: 2,
			categories: vec!["ai".to_string()],
		})
		.collect()
}
