use crate::error::{Error, Result};
use crate::models::{Assignment, Submission};
use std::collections::HashMap;

/// Attach each submission to the assignment it references.
///
/// Every returned assignment carries a (possibly empty) submission list. A
/// submission pointing at an assignment that is not in `assignments` is an
/// error. How many submissions each assignment ends up with is checked later,
/// when the assignments are analyzed.
pub fn join_submissions(
    course_id: &str,
    mut assignments: Vec<Assignment>,
    submissions: Vec<Submission>,
) -> Result<Vec<Assignment>> {
    let index: HashMap<String, usize> = assignments
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.clone(), i))
        .collect();

    for assignment in &mut assignments {
        assignment.submissions.clear();
    }

    for submission in submissions {
        let Some(&i) = index.get(&submission.assignment_id) else {
            return Err(Error::Join {
                course_id: course_id.to_string(),
                submission_id: submission.id,
                assignment_id: submission.assignment_id,
            });
        };
        assignments[i].submissions.push(submission);
    }

    Ok(assignments)
}
