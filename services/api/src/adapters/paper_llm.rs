//! services/api/src/adapters/paper_llm.rs
//!
//! This module contains the adapter for the paper-generating LLM.
//! It implements the `PaperGenerator` port from the `core` crate, talking to
//! Gemini through its OpenAI-compatible endpoint.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client, error::OpenAIError,
};
use async_trait::async_trait;
use questify_core::{
    contract,
    domain::{PaperRequest, QuestionPaper, PROGRAMMING_TYPE},
    ports::{PaperGenerator, PortError, PortResult},
};
use tracing::{error, warn};

const SYSTEM_INSTRUCTIONS: &str =
    "You are an expert educational content generator. You always reply with a single JSON \
     object and nothing else.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `PaperGenerator` against an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct GeminiPaperAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiPaperAdapter {
    /// Creates a new `GeminiPaperAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

/// Renders the full generation prompt for one request.
///
/// The JSON shape embedded here is the one the rest of the system is built
/// around (`domain::QuestionPaper`); the model is told to fill it in rather
/// than invent its own.
fn build_prompt(request: &PaperRequest) -> String {
    let levels_line = match &request.programming_levels {
        Some(levels) => format!("- Programming Difficulty Levels: {}\n", levels.join(", ")),
        None => String::new(),
    };
    let levels_for_special = request
        .programming_levels
        .as_ref()
        .map(|levels| levels.join(", "))
        .unwrap_or_else(|| "appropriate for the domain".to_string());

    let mut prompt = format!(
        "Generate a high-quality question paper based on the following parameters:\n\
         - Domain: {domain}\n\
         - Sub-domain/Class/Exam: {sub_domain}\n\
         - Subject: {subject}\n\
         - Topics: {topics}\n\
         - Question Types Requested: {question_types}\n\
         - Questions per Section: {num_questions}\n\
         {levels_line}\
         - Include Answers: {include_answers}\n\
         - Include Explanations: {include_explanations}\n\
         \n\
         Return the data strictly in the following JSON format:\n\
         {{\n\
           \"title\": \"Questify - Practice Paper\",\n\
           \"domainInfo\": \"{context}\",\n\
           \"instructions\": \"Attempt all questions. Questions are designed to test core conceptual understanding and practical application. Total marks are distributed per section.\",\n\
           \"sections\": [\n\
             {{\n\
               \"type\": \"Section Type (e.g., MCQs, Short Answers, Long Answers, Case-based, Programming codes)\",\n\
               \"questions\": [\n\
                 {{\n\
                   \"id\": 1,\n\
                   \"text\": \"The question text here\",\n\
                   \"options\": [\"Option A\", \"Option B\", \"Option C\", \"Option D\"], // Only for MCQs, otherwise empty array\n\
                   \"marks\": 1, // Suggest appropriate marks\n\
                   \"answer\": \"The correct answer\", // For 'Programming codes', provide a complete, well-indented code solution.\n\
                   \"explanation\": \"The explanation\" // Include only if includeExplanations is true\n\
                 }}\n\
               ]\n\
             }}\n\
           ]\n\
         }}\n",
        domain = request.domain,
        sub_domain = request.sub_domain,
        subject = request.subject.as_deref().unwrap_or(""),
        topics = request.topics,
        question_types = request.question_types.join(", "),
        num_questions = request.num_questions,
        levels_line = levels_line,
        include_answers = request.include_answers,
        include_explanations = request.include_explanations,
        context = request.context_line(),
    );

    if request.question_types.iter().any(|t| t == PROGRAMMING_TYPE) {
        prompt.push_str(&format!(
            "\nSpecial Instructions for 'Programming codes':\n\
             - Provide actual coding problems (e.g., 'Write a Python function to...', 'Implement a binary search in Java...').\n\
             - The 'answer' MUST be a clean, properly indented code block.\n\
             - Match the difficulty levels: {levels}.\n\
             - For 'Easy', focus on basic syntax and simple algorithms.\n\
             - For 'Mid', focus on intermediate data structures and logical problems.\n\
             - For 'Hard', focus on advanced algorithms, optimization, or complex system design.\n\
             - Ensure a balanced distribution of questions across the selected difficulty levels.\n",
            levels = levels_for_special,
        ));
    }

    prompt.push_str(
        "\nGeneral Instructions:\n\
         - Ensure the questions are syllabus-aligned.\n\
         - If \"Case-based\" is requested, provide a short paragraph followed by 2-3 related sub-questions.\n\
         - For MCQs, ensure options are plausible and clear.\n",
    );

    prompt
}

//=========================================================================================
// `PaperGenerator` Trait Implementation
//=========================================================================================

#[async_trait]
impl PaperGenerator for GeminiPaperAdapter {
    /// Generates a complete question paper for the given request.
    async fn generate(&self, request: &PaperRequest) -> PortResult<QuestionPaper> {
        let prompt = build_prompt(request);

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonObject)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected(
                    "Paper generation LLM response contained no text content.".to_string(),
                )
            })?;

        let paper = contract::parse_paper(&content).map_err(|e| {
            error!("JSON Parse Error: {}", e.raw);
            PortError::InvalidFormat(e.raw)
        })?;

        if paper.sections.is_empty() {
            warn!(
                model = %self.model,
                "generated paper has no sections for request {}",
                request.context_line()
            );
        }

        Ok(paper)
    }
}
