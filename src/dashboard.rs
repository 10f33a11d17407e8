use crate::error::Result;
use crate::manager::GradebookManager;
use crate::models::Teacher;
use crate::schema::{grades, students, subjects};
use diesel::prelude::*;
use serde::Serialize;

/// A subject and class pair that a teacher has graded at least once.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Serialize)]
pub struct TaughtCombination {
    pub subject_id: i32,
    pub subject_name: String,
    pub class_label: String,
}

impl GradebookManager {
    /// Lists the distinct subject and class pairs found in `teacher`'s grades.
    ///
    /// There is no separate teaching assignment: a pair shows up only once a grade exists for it.
    pub fn list_taught_combinations(
        &mut self,
        teacher: &Teacher,
    ) -> Result<Vec<TaughtCombination>> {
        Ok(grades::table
            .inner_join(subjects::table)
            .inner_join(students::table)
            .filter(grades::teacher_id.eq(teacher.id))
            .select((subjects::id, subjects::name, students::class_label))
            .distinct()
            .order((subjects::name.asc(), students::class_label.asc(), subjects::id.asc()))
            .load::<TaughtCombination>(&mut self.db)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::manager::tests::{date, memory_manager, student};

    #[test]
    fn lists_each_graded_subject_class_pair_once() {
        let mut manager = memory_manager();
        let hopper = manager.add_teacher("hopper").unwrap();
        let lovelace = manager.add_teacher("lovelace").unwrap();
        let math = manager.add_subject("Math").unwrap();
        let physics = manager.add_subject("Physics").unwrap();
        let pupils = manager
            .insert_students(&[
                student("Ann", "Brown", "5A"),
                student("Bob", "Carter", "5A"),
                student("Cid", "Adams", "5B"),
            ])
            .unwrap();

        for pupil in &pupils {
            manager
                .create_grade(&hopper, math.id, pupil.id, date(2025, 9, 1), 4, None)
                .unwrap();
        }
        manager
            .create_grade(&lovelace, physics.id, pupils[0].id, date(2025, 9, 1), 4, None)
            .unwrap();

        let combos: Vec<_> = manager
            .list_taught_combinations(&hopper)
            .unwrap()
            .into_iter()
            .map(|c| (c.subject_name, c.class_label))
            .collect();

        assert_eq!(
            combos,
            [
                ("Math".to_string(), "5A".to_string()),
                ("Math".to_string(), "5B".to_string()),
            ]
        );
    }

    #[test]
    fn teacher_without_grades_sees_nothing() {
        let mut manager = memory_manager();
        let hopper = manager.add_teacher("hopper").unwrap();
        manager.add_subject("Math").unwrap();
        manager.insert_students(&[student("Ann", "Brown", "5A")]).unwrap();

        assert!(manager.list_taught_combinations(&hopper).unwrap().is_empty());
    }
}
