use std::time::Instant;

use thiserror::Error;

use crate::evaluate::evaluate;
use crate::types::{Catalog, EvaluationError, Permutation, Slot, Value};

/// Caller-chosen bound on enumeration work, checked at every search step.
///
/// There is no implicit timeout: the default budget is unlimited, and a
/// catalog with several multi-valued choice fields can explode
/// combinatorially, so bulk callers should set one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Budget {
    max_permutations: Option<usize>,
    deadline: Option<Instant>,
}

impl Budget {
    /// No bound at all.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Stop after `limit` permutations have been produced.
    #[must_use]
    pub fn max_permutations(limit: usize) -> Self {
        Self {
            max_permutations: Some(limit),
            deadline: None,
        }
    }

    /// Stop once `at` has passed.
    #[must_use]
    pub fn deadline(at: Instant) -> Self {
        Self {
            max_permutations: None,
            deadline: Some(at),
        }
    }

    #[must_use]
    pub fn with_max_permutations(mut self, limit: usize) -> Self {
        self.max_permutations = Some(limit);
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(at);
        self
    }

    fn exceeded(&self, emitted: usize) -> bool {
        self.max_permutations.is_some_and(|limit| emitted >= limit)
            || self.deadline.is_some_and(|at| Instant::now() >= at)
    }
}

/// Why an enumeration run stopped early. Cancellation is not success: the
/// permutations yielded before it are a partial set.
#[derive(Debug, Error)]
pub enum EnumerateError {
    #[error("enumeration budget exhausted after {emitted} permutations")]
    Cancelled { emitted: usize },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

#[derive(Debug)]
enum Candidates {
    /// The field's predicate held (or it is hidden): branch over its
    /// candidate values.
    Expand(Vec<Value>),
    /// The predicate was false and the field is not hidden: one pseudo
    /// candidate that marks the slot omitted. Later fields still expand.
    Omit,
}

#[derive(Debug)]
struct Frame {
    depth: usize,
    candidates: Candidates,
    next: usize,
}

impl Frame {
    fn len(&self) -> usize {
        match &self.candidates {
            Candidates::Expand(values) => values.len(),
            Candidates::Omit => 1,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.next >= self.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Lazy depth-first enumeration of a catalog's permutations.
///
/// The search visits fields in catalog order with one mutable slot vector
/// under strict push-on-descend/pop-on-backtrack discipline; an explicit
/// frame stack replaces recursion so the iterator can suspend between
/// items. Iteration order is deterministic: re-creating the iterator on an
/// unchanged catalog reproduces the identical sequence.
///
/// Yields `Err(EnumerateError::Cancelled)` exactly once if the budget runs
/// out while unexplored permutations remain, then fuses. Because a false
/// predicate omits a field without pruning the branch, every remaining
/// candidate leads to at least one permutation, so cancellation never fires
/// on a search that had already finished.
#[derive(Debug)]
pub struct Permutations<'c> {
    catalog: &'c Catalog,
    budget: Budget,
    stack: Vec<Frame>,
    slots: Vec<Slot>,
    emitted: usize,
    state: State,
}

impl<'c> Permutations<'c> {
    pub(crate) fn new(catalog: &'c Catalog, budget: Budget) -> Self {
        Self {
            catalog,
            budget,
            stack: Vec::with_capacity(catalog.fields.len()),
            slots: vec![Slot::Unvisited; catalog.fields.len()],
            emitted: 0,
            state: State::Fresh,
        }
    }

    /// The number of permutations produced so far.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Run the iterator to completion, returning everything produced plus
    /// the error that stopped enumeration early, if any. This is the
    /// collect-style shape of the budget contract: the partial list travels
    /// with the cancellation signal.
    #[must_use]
    pub fn drain(self) -> (Vec<Permutation>, Option<EnumerateError>) {
        let mut permutations = Vec::new();
        let mut stop = None;
        for item in self {
            match item {
                Ok(p) => permutations.push(p),
                Err(e) => {
                    stop = Some(e);
                    break;
                }
            }
        }
        (permutations, stop)
    }

    fn push_frame(&mut self, depth: usize) -> Result<(), EvaluationError> {
        let field = &self.catalog.fields[depth];
        let include = field.is_hidden() || evaluate(&field.compiled, &self.slots)?;
        let candidates = if include {
            Candidates::Expand(field.candidates())
        } else {
            Candidates::Omit
        };
        self.stack.push(Frame {
            depth,
            candidates,
            next: 0,
        });
        Ok(())
    }

    fn emit(&self) -> Permutation {
        let entries = self
            .catalog
            .fields
            .iter()
            .zip(&self.slots)
            .filter_map(|(field, slot)| match slot {
                Slot::Assigned(value) => Some((field.name().to_owned(), value.clone())),
                Slot::Unvisited | Slot::Omitted => None,
            })
            .collect();
        Permutation::new(self.emitted, entries)
    }
}

impl Iterator for Permutations<'_> {
    type Item = Result<Permutation, EnumerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        let field_count = self.catalog.fields.len();

        match self.state {
            State::Done => return None,
            State::Fresh => {
                self.state = State::Running;
                if field_count == 0 {
                    // Unreachable through CatalogBuilder (a discriminator is
                    // required); the degenerate search yields one empty
                    // permutation.
                    self.state = State::Done;
                    if self.budget.exceeded(0) {
                        return Some(Err(EnumerateError::Cancelled { emitted: 0 }));
                    }
                    self.emitted = 1;
                    return Some(Ok(Permutation::new(0, Vec::new())));
                }
                if let Err(e) = self.push_frame(0) {
                    self.state = State::Done;
                    return Some(Err(e.into()));
                }
            }
            State::Running => {}
        }

        loop {
            // Backtrack over exhausted frames, restoring their slots.
            while let Some(frame) = self.stack.last() {
                if !frame.is_exhausted() {
                    break;
                }
                self.slots[frame.depth] = Slot::Unvisited;
                self.stack.pop();
            }
            let Some(frame_index) = self.stack.len().checked_sub(1) else {
                self.state = State::Done;
                return None;
            };
            if self.budget.exceeded(self.emitted) {
                self.state = State::Done;
                return Some(Err(EnumerateError::Cancelled {
                    emitted: self.emitted,
                }));
            }

            // Descend into the next candidate at the top frame.
            let frame = &mut self.stack[frame_index];
            let depth = frame.depth;
            self.slots[depth] = match &frame.candidates {
                Candidates::Expand(values) => Slot::Assigned(values[frame.next].clone()),
                Candidates::Omit => Slot::Omitted,
            };
            frame.next += 1;

            if depth + 1 == field_count {
                let permutation = self.emit();
                self.emitted += 1;
                return Some(Ok(permutation));
            }
            if let Err(e) = self.push_frame(depth + 1) {
                self.state = State::Done;
                return Some(Err(e.into()));
            }
        }
    }
}

impl std::iter::FusedIterator for Permutations<'_> {}
