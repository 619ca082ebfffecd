//! Prompt templates and response schemas sent to the model.
//!
//! The prompts are product copy in Brazilian Portuguese. Only parameter
//! substitution happens here; all reasoning is left to the model.

use crate::catalog::{board_context, display_board};
use crate::model::Question;
use crate::schema::Schema;

/// Mentor persona used as the system instruction for every call.
pub const SYSTEM_INSTRUCTION: &str = "Você é o 'IAprof mentor', um professor especialista em aprovação de alto rendimento. \
Sua metodologia é o Princípio de Pareto (80/20): você foca nos 20% dos assuntos que respondem por 80% das questões cobradas nos últimos 10 anos de concursos. \
Você conhece a fundo o perfil das bancas (FGV, Cebraspe, FCC, Vunesp e outras) e o estilo do ENEM. \
Seu tom é motivador, estratégico e voltado a resultados rápidos e sólidos.";

/// Used when the final feedback call returns no text.
pub const FALLBACK_FEEDBACK: &str = "Continue focado em seus estudos!";

pub fn course_subjects(course: &str, board: &str) -> String {
    let board_part = if board.trim().is_empty() {
        String::new()
    } else {
        format!(" da banca {board}")
    };
    format!(
        "Liste as 8 disciplinas mais importantes e recorrentes para o concurso/exame {course}{board_part}. \
         Responda apenas com um array JSON contendo os nomes das disciplinas."
    )
}

pub fn question(course: &str, board: &str, goal: &str, subject: Option<&str>) -> String {
    let target = subject
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("foco nos temas 80/20 de todas as matérias");
    format!(
        "Como IAprof mentor, gere uma questão inédita de múltipla escolha para: {course} ({context}).\n\
         Objetivo do aluno: \"{goal}\".\n\
         Disciplina alvo: {target}.\n\
         A questão deve reproduzir o nível de complexidade e as pegadinhas típicas desta banca. \
         correctAnswer é o índice (a partir de 0) da alternativa correta.",
        context = board_context(course, board),
    )
}

pub fn study_plan(course: &str, board: &str, subject: Option<&str>) -> String {
    let scope = match subject.filter(|s| !s.trim().is_empty()) {
        Some(s) => format!("na disciplina de {s}"),
        None => "considerando as matérias mais importantes".to_string(),
    };
    format!(
        "Liste os 10 tópicos mais recorrentes (Princípio 80/20) para o concurso {course} (Banca: {}) {scope}.",
        display_board(board)
    )
}

pub fn fixation(wrong: &Question, goal: &str, board: &str) -> String {
    format!(
        "O aluno errou uma questão de {subject} da banca {board}. Objetivo: \"{goal}\".\n\
         Enunciado: \"{text}\"\n\
         Aplique o método 80/20 para explicar por que este erro é fatal e como evitá-lo:\n\
         1. Passo a passo estratégico.\n\
         2. Conceito-chave.\n\
         3. 3 questões de fixação no estilo da banca.",
        subject = wrong.subject,
        board = display_board(board),
        text = wrong.text,
    )
}

pub const SOLVE_IMAGE: &str =
    "Analise esta imagem, extraia a questão e apresente a resolução com foco no método 80/20.";

pub const ESSAY_IMAGE: &str = "Esta é uma redação manuscrita. Primeiro faça a transcrição completa (OCR) \
e depois avalie rigorosamente pelos critérios do ENEM (5 competências). Forneça o resultado em JSON.";

pub fn essay_text(text: &str) -> String {
    format!("Avalie esta redação pelos critérios do ENEM:\n\n{text}")
}

pub fn final_feedback(goal: &str, correct: usize, total: usize) -> String {
    format!(
        "Dê o feedback final de mentoria para o aluno que busca \"{goal}\". Desempenho na sessão: {correct}/{total}.\n\
         Comente o progresso dele no \"Edital Estratégico 80/20\" e encerre com uma frase de impacto para a aprovação."
    )
}

// ---------------------------------------------------------------------------
// Response schemas
// ---------------------------------------------------------------------------

fn question_properties() -> Schema {
    Schema::object([
        ("id", Schema::string()),
        ("text", Schema::string()),
        ("options", Schema::array(Schema::string())),
        ("correctAnswer", Schema::integer()),
        ("subject", Schema::string()),
        ("difficulty", Schema::string().one_of(&["Fácil", "Médio", "Difícil"])),
    ])
}

pub fn subjects_schema() -> Schema {
    Schema::array(Schema::string())
}

pub fn question_schema() -> Schema {
    question_properties().require(&[
        "id",
        "text",
        "options",
        "correctAnswer",
        "subject",
        "difficulty",
    ])
}

pub fn study_plan_schema() -> Schema {
    Schema::array(
        Schema::object([
            ("id", Schema::string()),
            ("name", Schema::string()),
            (
                "weight",
                Schema::number().describe("Importância de 1 a 100 baseada na recorrência histórica"),
            ),
            ("status", Schema::string().one_of(&["Pendente"])),
        ])
        .require(&["id", "name", "weight", "status"]),
    )
}

pub fn fixation_schema() -> Schema {
    Schema::object([
        ("stepByStep", Schema::string()),
        ("mainTopic", Schema::string()),
        ("fixationQuestions", Schema::array(question_properties())),
    ])
}

pub fn ocr_schema() -> Schema {
    Schema::object([
        ("question", Schema::string()),
        ("answer", Schema::string()),
        ("explanation", Schema::string()),
    ])
}

pub fn essay_schema() -> Schema {
    let competency = || {
        Schema::object([
            ("score", Schema::number()),
            ("feedback", Schema::string()),
        ])
    };
    Schema::object([
        ("score", Schema::number()),
        (
            "competencies",
            Schema::object([
                ("c1", competency()),
                ("c2", competency()),
                ("c3", competency()),
                ("c4", competency()),
                ("c5", competency()),
            ]),
        ),
        ("generalFeedback", Schema::string()),
        ("suggestions", Schema::array(Schema::string())),
    ])
}
