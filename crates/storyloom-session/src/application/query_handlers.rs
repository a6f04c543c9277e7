//! Query handlers for the session engine.
//!
//! Read-only view DTOs a host renders from. Both views serialize to JSON.

use serde::Serialize;

use crate::application::controller::GameSession;

/// A choice the player can select right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    /// Index to pass back in `ApplyChoice`.
    pub index: usize,
    pub text: String,
}

/// What the main panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneView {
    pub scene_id: String,
    /// Text revealed so far.
    pub text: String,
    /// `true` while the reveal is still running.
    pub revealing: bool,
    /// Empty while input is locked.
    pub choices: Vec<ChoiceView>,
    pub hint_available: bool,
    pub custom_action_available: bool,
}

/// One attribute row of the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeView {
    pub key: String,
    pub label: String,
    pub value: i32,
    pub min_value: i32,
    pub max_value: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// An unlocked region with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionView {
    pub id: String,
    /// Falls back to the identifier when the story does not name the region.
    pub name: String,
    pub visited: bool,
}

/// What the status sidebar shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarView {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub attributes: Vec<AttributeView>,
    pub inventory: Vec<String>,
    pub achievements: Vec<String>,
    pub unlocked_regions: Vec<RegionView>,
    pub visited_regions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_score: Option<i64>,
    /// Attribute tips, in attribute order.
    pub tips: Vec<String>,
}

/// Builds the main-panel view of the current scene.
#[must_use]
pub fn scene_view(session: &GameSession) -> SceneView {
    let scene = session.current_scene();
    let choices = session
        .selectable_choices()
        .iter()
        .enumerate()
        .map(|(index, choice)| ChoiceView {
            index,
            text: choice.text.clone(),
        })
        .collect();
    SceneView {
        scene_id: scene.id.clone(),
        text: session.reveal().visible_text().to_owned(),
        revealing: !session.reveal().is_complete(),
        choices,
        hint_available: scene.has_advice,
        custom_action_available: scene.has_custom_action,
    }
}

/// Builds the status sidebar.
#[must_use]
pub fn sidebar_view(session: &GameSession) -> SidebarView {
    let config = session.config();
    let state = session.state();

    let attributes = config
        .attributes()
        .iter()
        .map(|attr| AttributeView {
            key: attr.key.clone(),
            label: attr.label.clone(),
            value: state
                .attributes
                .get(&attr.key)
                .copied()
                .unwrap_or(attr.initial_value),
            min_value: attr.bounds.min,
            max_value: attr.bounds.max,
            icon: attr.icon.clone(),
            color: attr.color.clone(),
        })
        .collect();

    let unlocked_regions = state
        .unlocked_regions
        .iter()
        .map(|id| RegionView {
            id: id.clone(),
            name: config
                .region(id)
                .map_or_else(|| id.clone(), |region| region.name.clone()),
            visited: state.visited_regions.contains(id),
        })
        .collect();

    SidebarView {
        title: config.title().to_owned(),
        subtitle: config.subtitle().map(str::to_owned),
        attributes,
        inventory: state.inventory.clone(),
        achievements: state.achievements.clone(),
        unlocked_regions,
        visited_regions: state.visited_regions.clone(),
        aggregate_score: state.aggregate_score,
        tips: config
            .attributes()
            .iter()
            .filter_map(|attr| attr.tip.clone())
            .collect(),
    }
}
