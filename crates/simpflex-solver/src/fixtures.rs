use crate::problem::Problem;

/// Laboratory work 1, solved in primal mode.
pub(crate) fn lab_1() -> Problem {
    Problem::new(
        vec![6.0, 6.0, 6.0],
        vec![
            vec![4.0, 1.0, 1.0],
            vec![1.0, 2.0, 0.0],
            vec![0.0, 0.5, 4.0],
        ],
        vec![5.0, 3.0, 8.0],
    )
    .unwrap()
}

/// Laboratory work 2, solved in dual mode.
pub(crate) fn lab_2() -> Problem {
    Problem::new(
        vec![3.0, 3.0, 7.0],
        vec![
            vec![1.0, 1.0, 1.0],
            vec![1.0, 4.0, 0.0],
            vec![0.0, 0.5, 3.0],
        ],
        vec![3.0, 5.0, 7.0],
    )
    .unwrap()
}
