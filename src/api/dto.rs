//! Wire shapes of the word-learning API and the PDF extraction service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordDto {
    pub id: Option<i64>,
    pub part_of_speech: Option<String>,
    pub word_writing: Option<String>,
    pub word: Option<String>,
    pub meaning_en: Option<String>,
    pub meaning_tr: Option<String>,
    pub example_sentence_en: Option<String>,
    pub example_sentence_tr: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordListDto {
    pub word_list_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub words: Vec<WordDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWordListRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWordRequest {
    pub sentence: String,
    pub word_start_index: usize,
    pub word_length: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    pub word_list_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionDto {
    pub writing: Option<String>,
    pub meaning_tr: Option<String>,
    pub meaning_en: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionDto {
    pub question_id: Option<i64>,
    pub question_type: Option<String>,
    pub question_sentence: Option<String>,
    pub options: Vec<OptionDto>,
    pub correct_answer_writings: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizDto {
    pub quiz_id: Option<i64>,
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PdfExtraction {
    pub success: bool,
    pub text: String,
    pub pages: Vec<String>,
    pub page_count: usize,
    pub method: String,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiz_dto_tolerates_missing_fields() {
        let json = r#"{
            "quizId": 12,
            "questions": [
                {"questionId": 1, "questionType": "MULTIPLE_CHOICE",
                 "questionSentence": "What does happy mean?",
                 "options": [{"writing": "happy", "meaningTr": "mutlu", "meaningEn": null}],
                 "correctAnswerWritings": ["happy"]},
                {"questionType": "FILL_IN_THE_BLANK"}
            ]
        }"#;
        let quiz: QuizDto = serde_json::from_str(json).unwrap();
        assert_eq!(quiz.quiz_id, Some(12));
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.questions[0].options[0].meaning_tr.as_deref(), Some("mutlu"));
        assert!(quiz.questions[1].correct_answer_writings.is_none());
        assert!(quiz.questions[1].options.is_empty());
    }

    #[test]
    fn test_add_word_request_is_camel_case() {
        let req = AddWordRequest {
            sentence: "I am happy.".to_string(),
            word_start_index: 5,
            word_length: 5,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["wordStartIndex"], 5);
        assert_eq!(json["wordLength"], 5);
    }

    #[test]
    fn test_word_list_dto_parses() {
        let json = r#"[{"wordListId": 3, "name": "Basics",
            "words": [{"id": 9, "wordWriting": "tired", "meaningTr": "yorgun"}]}]"#;
        let lists: Vec<WordListDto> = serde_json::from_str(json).unwrap();
        assert_eq!(lists[0].word_list_id, 3);
        assert_eq!(lists[0].words[0].word_writing.as_deref(), Some("tired"));
    }

    #[test]
    fn test_pdf_extraction_parses_snake_case() {
        let json = r#"{"success": true, "text": "Hello.", "pages": ["Hello."],
            "page_count": 1, "method": "text", "error": null}"#;
        let result: PdfExtraction = serde_json::from_str(json).unwrap();
        assert!(result.success);
        assert_eq!(result.page_count, 1);
        assert_eq!(result.method, "text");
    }
}
