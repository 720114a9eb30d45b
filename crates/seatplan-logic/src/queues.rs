//! Per-subject remaining-supply queues.
//!
//! Each subject owns its examinees in shuffled order plus a cursor; popping
//! advances the cursor instead of removing from the front of a list.

use std::collections::HashMap;

use crate::model::Examinee;

#[derive(Debug, Clone)]
struct SubjectQueue {
    subject: String,
    examinees: Vec<Examinee>,
    cursor: usize,
}

impl SubjectQueue {
    fn remaining(&self) -> usize {
        self.examinees.len() - self.cursor
    }
}

/// One FIFO queue per session subject, in session subject order.
#[derive(Debug, Clone, Default)]
pub struct SubjectQueues {
    queues: Vec<SubjectQueue>,
}

impl SubjectQueues {
    /// Bucket `examinees` by subject, keeping their relative order.
    ///
    /// `subjects` fixes the queue order; repeated codes collapse onto the
    /// first occurrence. Examinees whose subject is not listed are dropped.
    pub fn from_ordered<S: AsRef<str>>(subjects: &[S], examinees: Vec<Examinee>) -> Self {
        let mut queues: Vec<SubjectQueue> = Vec::with_capacity(subjects.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(subjects.len());
        for subject in subjects {
            let subject = subject.as_ref();
            if !index.contains_key(subject) {
                index.insert(subject.to_string(), queues.len());
                queues.push(SubjectQueue {
                    subject: subject.to_string(),
                    examinees: Vec::new(),
                    cursor: 0,
                });
            }
        }

        for examinee in examinees {
            if let Some(&i) = index.get(&examinee.subject) {
                queues[i].examinees.push(examinee);
            }
        }

        Self { queues }
    }

    /// Number of distinct subjects, including empty ones.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn subject(&self, idx: usize) -> &str {
        &self.queues[idx].subject
    }

    pub fn remaining(&self, idx: usize) -> usize {
        self.queues[idx].remaining()
    }

    pub fn total_remaining(&self) -> usize {
        self.queues.iter().map(SubjectQueue::remaining).sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.queues.iter().all(|q| q.remaining() == 0)
    }

    /// Subjects with supply left, most remaining first; ties keep subject order.
    pub fn candidates(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.queues.len())
            .filter(|&i| self.queues[i].remaining() > 0)
            .collect();
        // sort_by is stable
        order.sort_by(|&a, &b| self.queues[b].remaining().cmp(&self.queues[a].remaining()));
        order
    }

    /// Take the next examinee of subject `idx`.
    pub fn pop(&mut self, idx: usize) -> Option<Examinee> {
        let queue = self.queues.get_mut(idx)?;
        let examinee = queue.examinees.get(queue.cursor)?.clone();
        queue.cursor += 1;
        Some(examinee)
    }

    /// Everything not yet popped, subject order then FIFO within subject.
    pub fn into_leftovers(self) -> Vec<Examinee> {
        self.queues
            .into_iter()
            .flat_map(|q| {
                let cursor = q.cursor;
                q.examinees.into_iter().skip(cursor)
            })
            .collect()
    }
}
