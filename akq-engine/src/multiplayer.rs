//! Pass-and-play multiplayer: a strict turn-rotation state machine over a
//! fixed player list and question sequence.
//!
//! The "last player AND last question" check runs before the "last player
//! only" wrap, so every player answers every question exactly once before
//! the game finishes.

use serde::{Deserialize, Serialize};

/// One per-question record on a player's scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAnswer {
    pub id: String,
    pub correct: bool,
}

/// A multiplayer participant; lives for one session only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub correct_answers: u32,
    #[serde(default)]
    pub answered_questions: Vec<PlayerAnswer>,
}

impl Player {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            score: 0,
            correct_answers: 0,
            answered_questions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MultiplayerState {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub current_player_index: usize,
    #[serde(default)]
    pub current_question_index: usize,
    #[serde(default)]
    pub should_show_results: bool,
}

/// Reducer actions. Answer carries the acting player's index; keeping the
/// invariant `player_index == current_player_index` is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiplayerAction {
    Reset {
        players: Vec<Player>,
    },
    Answer {
        player_index: usize,
        question_id: String,
        is_correct: bool,
        points: u32,
        total_questions: usize,
    },
    Clear,
}

/// Final ranking verdict after the last answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Winner { player_id: String },
    Tie { score: u32 },
}

impl MultiplayerState {
    #[must_use]
    pub fn new(players: Vec<Player>) -> Self {
        Self {
            players,
            ..Self::default()
        }
    }

    /// Apply one action. All transitions are atomic single-struct updates.
    pub fn apply(&mut self, action: MultiplayerAction) {
        match action {
            MultiplayerAction::Reset { players } => {
                *self = Self::new(players);
            }
            MultiplayerAction::Clear => {
                *self = Self::default();
            }
            MultiplayerAction::Answer {
                player_index,
                question_id,
                is_correct,
                points,
                total_questions,
            } => {
                debug_assert!(
                    !self.should_show_results,
                    "answer dispatched after the game finished"
                );
                debug_assert_eq!(
                    player_index, self.current_player_index,
                    "out-of-turn answer"
                );
                if self.should_show_results {
                    return;
                }

                if let Some(player) = self.players.get_mut(player_index) {
                    player.score += points;
                    if is_correct {
                        player.correct_answers += 1;
                    }
                    player.answered_questions.push(PlayerAnswer {
                        id: question_id,
                        correct: is_correct,
                    });
                }

                let is_last_player = player_index + 1 >= self.players.len();
                let is_last_question = self.current_question_index + 1 >= total_questions;

                if is_last_player && is_last_question {
                    self.should_show_results = true;
                } else if is_last_player {
                    // Next question, back to the first player.
                    self.current_player_index = 0;
                    self.current_question_index += 1;
                } else {
                    self.current_player_index += 1;
                }
            }
        }
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    /// Players ranked by score, tie-broken by correct-answer count.
    #[must_use]
    pub fn standings(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.correct_answers.cmp(&a.correct_answers))
        });
        ranked
    }

    /// Winner or tie verdict; `None` with no players.
    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        let ranked = self.standings();
        let top = ranked.first()?;
        let tied = ranked.iter().filter(|p| p.score == top.score).count() > 1;
        Some(if tied {
            MatchOutcome::Tie { score: top.score }
        } else {
            MatchOutcome::Winner {
                player_id: top.id.clone(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(format!("p{i}"), format!("Player {i}")))
            .collect()
    }

    fn answer(state: &mut MultiplayerState, correct: bool, total_questions: usize) {
        let action = MultiplayerAction::Answer {
            player_index: state.current_player_index,
            question_id: format!("q{}", state.current_question_index),
            is_correct: correct,
            points: if correct { 10 } else { 0 },
            total_questions,
        };
        state.apply(action);
    }

    #[test]
    fn reset_zeroes_cursor_and_results_flag() {
        let mut state = MultiplayerState::default();
        state.apply(MultiplayerAction::Reset {
            players: players(2),
        });
        assert_eq!(state.players.len(), 2);
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.current_question_index, 0);
        assert!(!state.should_show_results);
    }

    #[test]
    fn turn_rotates_through_players_before_advancing_question() {
        let mut state = MultiplayerState::new(players(3));
        answer(&mut state, true, 2);
        assert_eq!(state.current_player_index, 1);
        assert_eq!(state.current_question_index, 0);
        answer(&mut state, false, 2);
        assert_eq!(state.current_player_index, 2);
        answer(&mut state, true, 2);
        // Wrapped to the next question.
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.current_question_index, 1);
    }

    #[test]
    fn finishes_exactly_on_the_last_answer() {
        let total_questions = 4;
        let mut state = MultiplayerState::new(players(3));
        for turn in 0..(3 * total_questions) {
            assert!(!state.should_show_results, "finished early on turn {turn}");
            answer(&mut state, turn % 2 == 0, total_questions);
        }
        assert!(state.should_show_results);
        for player in &state.players {
            assert_eq!(player.answered_questions.len(), total_questions);
        }
    }

    #[test]
    fn single_player_single_question_finishes_immediately() {
        let mut state = MultiplayerState::new(players(1));
        answer(&mut state, true, 1);
        assert!(state.should_show_results);
        assert_eq!(state.players[0].score, 10);
    }

    #[test]
    fn scoring_tracks_points_and_correct_tally() {
        let mut state = MultiplayerState::new(players(2));
        answer(&mut state, true, 1);
        answer(&mut state, false, 1);
        assert_eq!(state.players[0].score, 10);
        assert_eq!(state.players[0].correct_answers, 1);
        assert_eq!(state.players[1].score, 0);
        assert_eq!(state.players[1].correct_answers, 0);
    }

    #[test]
    fn standings_break_ties_by_correct_answers() {
        let mut state = MultiplayerState::new(players(3));
        state.players[0].score = 20;
        state.players[0].correct_answers = 2;
        state.players[1].score = 30;
        state.players[1].correct_answers = 3;
        state.players[2].score = 20;
        state.players[2].correct_answers = 1;

        let ranked = state.standings();
        let ids: Vec<&str> = ranked.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p1", "p0", "p2"]);
        assert_eq!(
            state.outcome(),
            Some(MatchOutcome::Winner {
                player_id: "p1".to_string()
            })
        );
    }

    #[test]
    fn shared_top_score_is_a_tie() {
        let mut state = MultiplayerState::new(players(2));
        state.players[0].score = 20;
        state.players[1].score = 20;
        state.players[1].correct_answers = 2;
        assert_eq!(state.outcome(), Some(MatchOutcome::Tie { score: 20 }));
    }

    #[test]
    fn clear_abandons_the_session() {
        let mut state = MultiplayerState::new(players(2));
        answer(&mut state, true, 3);
        state.apply(MultiplayerAction::Clear);
        assert_eq!(state, MultiplayerState::default());
        assert!(state.outcome().is_none());
    }
}
