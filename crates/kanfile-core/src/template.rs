//! Named task templates with placeholder substitution.
//!
//! A template holds `{placeholder}` markers in its title and description.
//! Applying it substitutes the supplied variables, leaves unknown markers
//! verbatim, and computes a due date from the estimated effort.

use crate::state::{Priority, Status};
use crate::TaskDraft;
use std::collections::{BTreeMap, BTreeSet};
use time::{Duration, OffsetDateTime};

/// Parameterized skeleton for producing a pre-filled task draft.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTemplate {
    /// Stable identifier used to select the template.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line summary of what the template is for.
    pub description: String,
    /// Emoji shown in pickers.
    pub icon: String,
    /// Grouping key for pickers.
    pub category: String,
    /// Priority of the produced draft.
    pub default_priority: Priority,
    /// Column the produced draft starts in.
    pub default_status: Status,
    /// Title with `{placeholder}` markers.
    pub title_template: String,
    /// Markdown body with `{placeholder}` markers.
    pub description_template: String,
    /// Labels copied onto the draft.
    pub tags: BTreeSet<String>,
    /// When set, the draft is due this many days from now.
    pub estimated_days: Option<i64>,
}

impl TaskTemplate {
    /// Expand the template into a draft.
    ///
    /// Every `{key}` occurrence for a supplied variable is replaced in both
    /// the title and the description; placeholders without a matching
    /// variable are left verbatim.
    #[must_use]
    pub fn apply(&self, variables: &BTreeMap<String, String>, now: OffsetDateTime) -> TaskDraft {
        let title = substitute(&self.title_template, variables);
        let description = substitute(&self.description_template, variables);
        TaskDraft {
            title,
            description: (!description.is_empty()).then_some(description),
            status: self.default_status,
            priority: self.default_priority,
            due_date: self.estimated_days.map(|days| now + Duration::days(days)),
            tags: self.tags.clone(),
        }
    }
}

fn substitute(template: &str, variables: &BTreeMap<String, String>) -> String {
    let mut out = template.to_owned();
    for (key, value) in variables {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// One-tap draft shortcut shown next to the template picker.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickAction {
    /// Stable identifier used to select the action.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Emoji shown in pickers.
    pub icon: String,
    /// One-line summary.
    pub description: String,
    /// The pre-filled draft; the title is a prefix the user completes.
    pub draft: TaskDraft,
}

/// The stock template catalog.
#[must_use]
pub fn builtin_templates() -> Vec<TaskTemplate> {
    vec![
        TaskTemplate {
            id: "bug-fix".into(),
            name: "Bug Fix".into(),
            description: "Fix a reported bug or issue".into(),
            icon: "🐛".into(),
            category: "Development".into(),
            default_priority: Priority::High,
            default_status: Status::Todo,
            title_template: "Fix: {bug_title}".into(),
            description_template: "## Bug Description\n{bug_description}\n\n\
                ## Steps to Reproduce\n1. {step_1}\n2. {step_2}\n3. {step_3}\n\n\
                ## Expected Behavior\n{expected_behavior}\n\n\
                ## Actual Behavior\n{actual_behavior}\n\n\
                ## Additional Context\n{additional_context}"
                .into(),
            tags: tag_set(&["bug", "fix"]),
            estimated_days: Some(2),
        },
        TaskTemplate {
            id: "feature".into(),
            name: "New Feature".into(),
            description: "Implement a new feature or enhancement".into(),
            icon: "✨".into(),
            category: "Development".into(),
            default_priority: Priority::Medium,
            default_status: Status::Todo,
            title_template: "Feature: {feature_name}".into(),
            description_template: "## Feature Description\n{feature_description}\n\n\
                ## Requirements\n- [ ] {requirement_1}\n- [ ] {requirement_2}\n- [ ] {requirement_3}\n\n\
                ## Acceptance Criteria\n- [ ] {criteria_1}\n- [ ] {criteria_2}\n- [ ] {criteria_3}\n\n\
                ## Technical Notes\n{technical_notes}"
                .into(),
            tags: tag_set(&["feature", "enhancement"]),
            estimated_days: Some(5),
        },
        TaskTemplate {
            id: "refactor".into(),
            name: "Code Refactor".into(),
            description: "Improve existing code structure".into(),
            icon: "🔧".into(),
            category: "Development".into(),
            default_priority: Priority::Low,
            default_status: Status::Todo,
            title_template: "Refactor: {component_name}".into(),
            description_template: "## Refactoring Goal\n{refactor_goal}\n\n\
                ## Current Issues\n- {issue_1}\n- {issue_2}\n\n\
                ## Proposed Changes\n- {change_1}\n- {change_2}\n\n\
                ## Benefits\n- {benefit_1}\n- {benefit_2}"
                .into(),
            tags: tag_set(&["refactor", "cleanup"]),
            estimated_days: Some(3),
        },
        TaskTemplate {
            id: "ui-design".into(),
            name: "UI Design".into(),
            description: "Design user interface components".into(),
            icon: "🎨".into(),
            category: "Design".into(),
            default_priority: Priority::Medium,
            default_status: Status::Todo,
            title_template: "Design: {component_name}".into(),
            description_template: "## Design Requirements\n{design_requirements}\n\n\
                ## User Flow\n1. {flow_step_1}\n2. {flow_step_2}\n3. {flow_step_3}\n\n\
                ## Design Specifications\n- **Colors:** {color_scheme}\n\
                - **Typography:** {typography}\n- **Spacing:** {spacing}\n\n\
                ## Responsive Considerations\n{responsive_notes}"
                .into(),
            tags: tag_set(&["design", "ui"]),
            estimated_days: Some(2),
        },
        TaskTemplate {
            id: "research".into(),
            name: "Research Task".into(),
            description: "Investigate and research a topic".into(),
            icon: "🔍".into(),
            category: "Research".into(),
            default_priority: Priority::Medium,
            default_status: Status::Todo,
            title_template: "Research: {research_topic}".into(),
            description_template: "## Research Objective\n{research_objective}\n\n\
                ## Key Questions\n- {question_1}\n- {question_2}\n- {question_3}\n\n\
                ## Resources to Explore\n- [ ] {resource_1}\n- [ ] {resource_2}\n- [ ] {resource_3}\n\n\
                ## Expected Outcomes\n{expected_outcomes}"
                .into(),
            tags: tag_set(&["research", "investigation"]),
            estimated_days: Some(1),
        },
        TaskTemplate {
            id: "meeting".into(),
            name: "Meeting Preparation".into(),
            description: "Prepare for an upcoming meeting".into(),
            icon: "📅".into(),
            category: "Planning".into(),
            default_priority: Priority::Medium,
            default_status: Status::Todo,
            title_template: "Meeting: {meeting_topic}".into(),
            description_template: "## Meeting Details\n- **Date:** {meeting_date}\n\
                - **Time:** {meeting_time}\n- **Attendees:** {attendees}\n\n\
                ## Agenda\n1. {agenda_item_1}\n2. {agenda_item_2}\n3. {agenda_item_3}\n\n\
                ## Preparation Tasks\n- [ ] {prep_task_1}\n- [ ] {prep_task_2}\n\n\
                ## Questions to Ask\n- {question_1}\n- {question_2}"
                .into(),
            tags: tag_set(&["meeting", "planning"]),
            estimated_days: Some(1),
        },
        TaskTemplate {
            id: "testing".into(),
            name: "Testing Task".into(),
            description: "Test functionality or write tests".into(),
            icon: "🧪".into(),
            category: "Quality Assurance".into(),
            default_priority: Priority::High,
            default_status: Status::Todo,
            title_template: "Test: {feature_name}".into(),
            description_template: "## Testing Scope\n{testing_scope}\n\n\
                ## Test Cases\n### Happy Path\n- [ ] {happy_case_1}\n- [ ] {happy_case_2}\n\n\
                ### Edge Cases\n- [ ] {edge_case_1}\n- [ ] {edge_case_2}\n\n\
                ### Error Handling\n- [ ] {error_case_1}\n- [ ] {error_case_2}\n\n\
                ## Test Data\n{test_data}"
                .into(),
            tags: tag_set(&["testing", "qa"]),
            estimated_days: Some(2),
        },
        TaskTemplate {
            id: "documentation".into(),
            name: "Documentation".into(),
            description: "Write or update documentation".into(),
            icon: "📚".into(),
            category: "Documentation".into(),
            default_priority: Priority::Low,
            default_status: Status::Todo,
            title_template: "Docs: {doc_topic}".into(),
            description_template: "## Documentation Goal\n{doc_goal}\n\n\
                ## Target Audience\n{target_audience}\n\n\
                ## Content Outline\n1. {section_1}\n2. {section_2}\n3. {section_3}\n\n\
                ## Key Points to Cover\n- {key_point_1}\n- {key_point_2}\n- {key_point_3}\n\n\
                ## Examples Needed\n- {example_1}\n- {example_2}"
                .into(),
            tags: tag_set(&["documentation", "writing"]),
            estimated_days: Some(1),
        },
    ]
}

/// Look up a builtin template by id.
#[must_use]
pub fn find_template(id: &str) -> Option<TaskTemplate> {
    builtin_templates().into_iter().find(|template| template.id == id)
}

/// The builtin catalog grouped by category, preserving catalog order.
#[must_use]
pub fn templates_by_category() -> Vec<(String, Vec<TaskTemplate>)> {
    let mut grouped: Vec<(String, Vec<TaskTemplate>)> = Vec::new();
    for template in builtin_templates() {
        match grouped.iter_mut().find(|(category, _)| *category == template.category) {
            Some((_, templates)) => templates.push(template),
            None => grouped.push((template.category.clone(), vec![template])),
        }
    }
    grouped
}

/// One-tap draft shortcuts.
#[must_use]
pub fn quick_actions(now: OffsetDateTime) -> Vec<QuickAction> {
    vec![
        QuickAction {
            id: "urgent-task".into(),
            name: "Urgent Task".into(),
            icon: "🚨".into(),
            description: "High priority task due today".into(),
            draft: TaskDraft {
                title: "Urgent: ".into(),
                priority: Priority::High,
                status: Status::Todo,
                due_date: Some(now),
                tags: tag_set(&["urgent"]),
                ..TaskDraft::default()
            },
        },
        QuickAction {
            id: "quick-note".into(),
            name: "Quick Note".into(),
            icon: "📝".into(),
            description: "Simple note or reminder".into(),
            draft: TaskDraft {
                title: "Note: ".into(),
                priority: Priority::Low,
                status: Status::Todo,
                tags: tag_set(&["note"]),
                ..TaskDraft::default()
            },
        },
        QuickAction {
            id: "tomorrow-task".into(),
            name: "Tomorrow Task".into(),
            icon: "📅".into(),
            description: "Task to be done tomorrow".into(),
            draft: TaskDraft {
                title: "Tomorrow: ".into(),
                priority: Priority::Medium,
                status: Status::Todo,
                due_date: Some(now + Duration::days(1)),
                tags: tag_set(&["scheduled"]),
                ..TaskDraft::default()
            },
        },
        QuickAction {
            id: "weekly-goal".into(),
            name: "Weekly Goal".into(),
            icon: "🎯".into(),
            description: "Goal to accomplish this week".into(),
            draft: TaskDraft {
                title: "Weekly Goal: ".into(),
                priority: Priority::Medium,
                status: Status::Todo,
                due_date: Some(now + Duration::days(7)),
                tags: tag_set(&["goal", "weekly"]),
                ..TaskDraft::default()
            },
        },
    ]
}

/// Look up a quick action by id.
#[must_use]
pub fn find_quick_action(id: &str, now: OffsetDateTime) -> Option<QuickAction> {
    quick_actions(now).into_iter().find(|action| action.id == id)
}

fn tag_set(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|&tag| tag.to_owned()).collect()
}
