//! Preset courses and exam boards.

/// Courses offered as presets. Any other course name is accepted too.
pub const COURSES: &[&str] = &[
    "ENEM",
    "PRF",
    "PF",
    "OAB",
    "Concursos Militares",
    "Magistratura",
    "Receita Federal",
];

/// Exam boards ("bancas") offered as presets.
pub const BOARDS: &[&str] = &["Cebraspe", "FGV", "FCC", "Vunesp", "IDECAN", "FGV OAB"];

const FALLBACK_SUBJECTS: &[&str] = &[
    "Português",
    "Matemática",
    "Direito Constitucional",
    "Direito Administrativo",
    "Informática",
];

/// ENEM has no board; its own profile stands in for one.
pub fn is_enem(course: &str) -> bool {
    course.trim().eq_ignore_ascii_case("enem")
}

/// Style context used when asking for a question.
pub fn board_context(course: &str, board: &str) -> String {
    if is_enem(course) {
        "perfil do ENEM".to_string()
    } else {
        format!("perfil da banca {board}")
    }
}

/// Board name for display and plan prompts, `ENEM` when none was chosen.
pub fn display_board(board: &str) -> &str {
    if board.trim().is_empty() {
        "ENEM"
    } else {
        board
    }
}

/// Subjects used when the model's subject listing cannot be parsed.
pub fn fallback_subjects() -> Vec<String> {
    FALLBACK_SUBJECTS.iter().map(|s| s.to_string()).collect()
}
