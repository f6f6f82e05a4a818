//! Board projection: derives the three stage columns from a task snapshot.
//!
//! The projection is a pure function of its inputs. Recomputing it from the
//! same tasks, users and filter always yields the same view.

use super::{Stage, Task, TaskId, User, UserId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Display name used when a task has no assignee or references a missing user.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Assignee filter compared against task assignees in normalised form.
///
/// Identifiers reach the board as numbers from the store and as strings from
/// selection inputs; both are reduced to the same canonical text before
/// comparing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssigneeFilter(String);

impl AssigneeFilter {
    /// Builds a filter from raw input.
    ///
    /// Returns `None` for blank input, which means "all users". Numeric input
    /// is compared by value, not by its literal text, so `"01"` and `"+1"`
    /// both select user `1`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = trimmed
            .parse::<UserId>()
            .map_or_else(|_| trimmed.to_owned(), |id| id.to_string());
        Some(Self(normalized))
    }

    /// Builds a filter matching a specific user.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self(user_id.to_string())
    }

    /// Returns the normalised filter value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the assignee normalises to the filter value.
    /// Unassigned tasks never match.
    #[must_use]
    pub fn matches(&self, assignee_id: Option<UserId>) -> bool {
        assignee_id.is_some_and(|id| id.to_string() == self.0)
    }
}

/// A task placed on the board with its resolved presentation fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardCard {
    /// The underlying task.
    pub task: Task,
    /// Resolved assignee name, or [`UNASSIGNED_LABEL`].
    pub assignee_name: String,
    /// Avatar initials derived from the assignee name.
    pub initials: String,
    /// Progress clamped to `0..=100`.
    pub progress: u8,
}

/// One stage column, sorted by due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    /// Stage the column represents.
    pub stage: Stage,
    /// Column heading.
    pub title: &'static str,
    /// Cards in display order.
    pub cards: Vec<BoardCard>,
}

impl BoardColumn {
    fn empty(stage: Stage) -> Self {
        Self {
            stage,
            title: stage.title(),
            cards: Vec::new(),
        }
    }

    /// Returns the identifiers of the cards in display order.
    #[must_use]
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.cards.iter().map(|card| card.task.id()).collect()
    }

    /// Returns the number of cards in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns `true` when the column holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// The derived three-column board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Column for [`Stage::Todo`].
    pub todo: BoardColumn,
    /// Column for [`Stage::InProgress`].
    pub in_progress: BoardColumn,
    /// Column for [`Stage::Done`].
    pub done: BoardColumn,
    /// Tasks left off the board because their status is not a known stage.
    pub unplaced: Vec<TaskId>,
}

impl BoardView {
    /// Returns the column for `stage`.
    #[must_use]
    pub const fn column(&self, stage: Stage) -> &BoardColumn {
        match stage {
            Stage::Todo => &self.todo,
            Stage::InProgress => &self.in_progress,
            Stage::Done => &self.done,
        }
    }

    fn column_mut(&mut self, stage: Stage) -> &mut BoardColumn {
        match stage {
            Stage::Todo => &mut self.todo,
            Stage::InProgress => &mut self.in_progress,
            Stage::Done => &mut self.done,
        }
    }

    /// Returns the columns in workflow order.
    #[must_use]
    pub const fn columns(&self) -> [&BoardColumn; 3] {
        [&self.todo, &self.in_progress, &self.done]
    }

    /// Returns the total number of placed cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.columns().iter().map(|column| column.len()).sum()
    }
}

/// Derives the board from a task and user snapshot.
///
/// Tasks are filtered by assignee (when a filter is given), partitioned by
/// stage, and sorted ascending by due date within each column. Undated tasks
/// sort as if due on 1970-01-01, so they lead their column. The sort is
/// stable, so tasks with equal keys keep their store order.
#[must_use]
pub fn project(tasks: &[Task], users: &[User], filter: Option<&AssigneeFilter>) -> BoardView {
    let names: HashMap<UserId, &str> = users.iter().map(|user| (user.id(), user.name())).collect();
    let mut view = BoardView {
        todo: BoardColumn::empty(Stage::Todo),
        in_progress: BoardColumn::empty(Stage::InProgress),
        done: BoardColumn::empty(Stage::Done),
        unplaced: Vec::new(),
    };

    let visible = tasks
        .iter()
        .filter(|task| filter.is_none_or(|assignee| assignee.matches(task.assignee_id())));
    for task in visible {
        let Some(stage) = task.stage() else {
            view.unplaced.push(task.id());
            continue;
        };
        let card = card_for(task, &names);
        view.column_mut(stage).cards.push(card);
    }

    for stage in Stage::ALL {
        view.column_mut(stage)
            .cards
            .sort_by_key(|card| due_date_key(&card.task));
    }

    if !view.unplaced.is_empty() {
        tracing::warn!(
            count = view.unplaced.len(),
            task_ids = ?view.unplaced,
            "tasks with an unrecognised status were left off the board"
        );
    }

    view
}

fn card_for(task: &Task, names: &HashMap<UserId, &str>) -> BoardCard {
    let assignee_name = task
        .assignee_id()
        .and_then(|id| names.get(&id).copied())
        .unwrap_or(UNASSIGNED_LABEL)
        .to_owned();
    BoardCard {
        task: task.clone(),
        initials: initials(&assignee_name),
        assignee_name,
        progress: task.display_progress(),
    }
}

fn due_date_key(task: &Task) -> NaiveDate {
    // `NaiveDate::default()` is 1970-01-01.
    task.due_date().unwrap_or_default()
}

/// Derives avatar initials: the first letter of each of the first two
/// space-separated words, uppercased.
#[must_use]
pub fn initials(name: &str) -> String {
    name.split(' ')
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
