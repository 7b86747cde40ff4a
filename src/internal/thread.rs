//! Visibility state over a flat comment sequence.
//!
//! The thread holds comments in document order with a depth level; a
//! comment's descendants are the contiguous run of following entries at a
//! strictly greater level. Every operation here is a range scan bounded by
//! a level comparison, not a pointer walk. `&mut self` serializes toggles:
//! one completes fully before the next begins.

use crate::internal::models::{Comment, CommentVisibility};

/// Result of toggling a comment's subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Raw sequence positions whose visibility changed (descendants only;
    /// the toggled comment itself always changes).
    pub changed: Vec<usize>,
    /// The toggled comment's resulting visibility.
    pub visibility: CommentVisibility,
}

/// Owns the flat, depth-annotated comment sequence and drives all
/// visibility transitions. Nothing else may set visibility after parse.
#[derive(Debug, Default)]
pub struct CommentThread {
    comments: Vec<Comment>,
}

impl CommentThread {
    pub fn new(comments: Vec<Comment>) -> Self {
        Self { comments }
    }

    /// Replace the sequence, dropping previous visibility state.
    pub fn set(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn get(&self, index: usize) -> Option<&Comment> {
        self.comments.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Comment> {
        self.comments.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Raw positions of all entries that are not hidden, in original order.
    /// Display layers iterate this, never the raw sequence.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.comments
            .iter()
            .enumerate()
            .filter(|(_, c)| c.visibility != CommentVisibility::Hidden)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.comments
            .iter()
            .filter(|c| c.visibility != CommentVisibility::Hidden)
            .count()
    }

    /// Number of descendants of the entry at `index`: the run of following
    /// entries at a strictly greater level.
    pub fn descendant_count(&self, index: usize) -> usize {
        let Some(comment) = self.comments.get(index) else {
            return 0;
        };
        self.comments[index + 1..]
            .iter()
            .take_while(|c| c.level > comment.level)
            .count()
    }

    /// Toggle the subtree rooted at raw position `index`.
    ///
    /// A visible comment becomes compact and its descendants hide; entries
    /// already hidden stay hidden so their own collapsed subtrees survive a
    /// later re-expand of an ancestor. A compact comment becomes visible
    /// and every descendant is revealed as visible; nested collapse state
    /// below it is deliberately not restored.
    pub fn toggle(&mut self, index: usize) -> Option<ToggleOutcome> {
        let was_visible = self.get(index)?.visibility == CommentVisibility::Visible;
        let level = self.comments[index].level;

        self.comments[index].visibility = if was_visible {
            CommentVisibility::Compact
        } else {
            CommentVisibility::Visible
        };

        let mut changed = Vec::new();
        for i in index + 1..self.comments.len() {
            if self.comments[i].level <= level {
                break;
            }
            if was_visible {
                // collapsing: preserve independently-hidden entries
                if self.comments[i].visibility == CommentVisibility::Hidden {
                    continue;
                }
                self.comments[i].visibility = CommentVisibility::Hidden;
                changed.push(i);
            } else {
                if self.comments[i].visibility != CommentVisibility::Visible {
                    changed.push(i);
                }
                self.comments[i].visibility = CommentVisibility::Visible;
            }
        }

        Some(ToggleOutcome {
            changed,
            visibility: self.comments[index].visibility,
        })
    }

    /// Collapse the thread enclosing the entry at raw position `index` by
    /// toggling its nearest preceding ancestor (the entry itself when it is
    /// already top-level). Returns the toggled position.
    pub fn hide_branch(&mut self, index: usize) -> Option<usize> {
        let level = self.get(index)?.level;
        let target = if level == 0 {
            index
        } else {
            (0..index).rev().find(|&i| self.comments[i].level < level)?
        };
        self.toggle(target);
        Some(target)
    }

    /// Position of the nearest top-level ancestor within the *visible*
    /// subsequence, given a visible-subsequence index. Used to scroll to
    /// the root of a deeply nested comment.
    pub fn root_index_for(&self, visible_index: usize) -> Option<usize> {
        let visible = self.visible_indices();
        if visible_index >= visible.len() {
            return None;
        }
        (0..=visible_index)
            .rev()
            .find(|&i| self.comments[visible[i]].level == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(id: u32, level: usize) -> Comment {
        Comment::new(id, "1 hour ago", format!("comment {id}"), "user", level, false)
    }

    /// 0: a
    /// 1:   b
    /// 2:     c
    /// 3:   d
    /// 4: e
    /// 5:   f
    fn sample() -> CommentThread {
        CommentThread::new(vec![
            comment(1, 0),
            comment(2, 1),
            comment(3, 2),
            comment(4, 1),
            comment(5, 0),
            comment(6, 1),
        ])
    }

    #[test]
    fn descendant_count_spans_whole_subtree() {
        let thread = sample();
        assert_eq!(thread.descendant_count(0), 3);
        assert_eq!(thread.descendant_count(1), 1);
        assert_eq!(thread.descendant_count(4), 1);
        assert_eq!(thread.descendant_count(5), 0);
    }

    #[test]
    fn toggle_collapses_subtree() {
        let mut thread = sample();
        let outcome = thread.toggle(0).unwrap();
        assert_eq!(outcome.visibility, CommentVisibility::Compact);
        assert_eq!(outcome.changed, vec![1, 2, 3]);
        assert_eq!(
            thread.comments()[0].visibility,
            CommentVisibility::Compact
        );
        for i in 1..=3 {
            assert_eq!(thread.comments()[i].visibility, CommentVisibility::Hidden);
        }
        // sibling tree untouched
        assert_eq!(thread.comments()[4].visibility, CommentVisibility::Visible);
        assert_eq!(thread.visible_count(), 3);
    }

    #[test]
    fn toggle_twice_restores_visible_descendants() {
        let mut thread = sample();
        thread.toggle(0);
        let outcome = thread.toggle(0).unwrap();
        assert_eq!(outcome.visibility, CommentVisibility::Visible);
        for c in thread.comments() {
            assert_eq!(c.visibility, CommentVisibility::Visible);
        }
    }

    #[test]
    fn collapsing_preserves_already_hidden_entries() {
        let mut thread = sample();
        // collapse b first: c hides
        thread.toggle(1);
        assert_eq!(thread.comments()[2].visibility, CommentVisibility::Hidden);
        // collapse a: b hides, c stays hidden and is not reported again
        let outcome = thread.toggle(0).unwrap();
        assert_eq!(outcome.changed, vec![1, 3]);
        assert_eq!(thread.comments()[2].visibility, CommentVisibility::Hidden);
    }

    #[test]
    fn expanding_reveals_one_level_as_visible() {
        let mut thread = sample();
        thread.toggle(1); // b compact, c hidden
        thread.toggle(0); // a compact, b/d hidden
        thread.toggle(0); // expand a again
        // the documented simplification: c is revealed visible, b's prior
        // compact state is not restored
        assert_eq!(thread.comments()[1].visibility, CommentVisibility::Visible);
        assert_eq!(thread.comments()[2].visibility, CommentVisibility::Visible);
    }

    #[test]
    fn hide_branch_toggles_enclosing_parent() {
        let mut thread = sample();
        // from the grandchild c, the nearest lower-level entry is b
        let toggled = thread.hide_branch(2).unwrap();
        assert_eq!(toggled, 1);
        assert_eq!(thread.comments()[1].visibility, CommentVisibility::Compact);
        assert_eq!(thread.comments()[2].visibility, CommentVisibility::Hidden);
    }

    #[test]
    fn hide_branch_on_top_level_toggles_itself() {
        let mut thread = sample();
        let toggled = thread.hide_branch(4).unwrap();
        assert_eq!(toggled, 4);
        assert_eq!(thread.comments()[4].visibility, CommentVisibility::Compact);
        assert_eq!(thread.comments()[5].visibility, CommentVisibility::Hidden);
    }

    #[test]
    fn visible_indices_match_brute_force_filter() {
        let mut thread = sample();
        thread.toggle(1);
        thread.toggle(4);
        let brute: Vec<usize> = thread
            .comments()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.visibility != CommentVisibility::Hidden)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(thread.visible_indices(), brute);
        assert_eq!(thread.visible_count(), brute.len());
    }

    #[test]
    fn root_index_for_walks_back_to_top_level() {
        let thread = sample();
        // visible == raw here; c at visible index 2 roots at a (index 0)
        assert_eq!(thread.root_index_for(2), Some(0));
        assert_eq!(thread.root_index_for(5), Some(4));
        assert_eq!(thread.root_index_for(0), Some(0));
        assert_eq!(thread.root_index_for(99), None);
    }

    #[test]
    fn root_index_for_uses_visible_positions() {
        let mut thread = sample();
        thread.toggle(0); // hides raw 1..=3
        // visible: [0(a), 4(e), 5(f)]; f at visible index 2 roots at e
        assert_eq!(thread.root_index_for(2), Some(1));
    }
}
