//! Snapshot tests for the OpenAI client

#[cfg(test)]
mod snapshot_tests {
    use crate::client::{CompletionRequest, EmbeddingRequest};
    use crate::{ChatMessage, ChatRequest, OpenAiClient, OpenAiConfig};
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_config_snapshot() {
        let config = OpenAiConfig::new("sk-live-secret".to_string());

        assert_yaml_snapshot!(config, {
            ".api_key" => "[redacted]",
        }, @r#"
        api_key: "[redacted]"
        base_url: "https://api.openai.com/v1"
        embedding_model: text-embedding-ada-002
        chat_model: gpt-3.5-turbo
        request_timeout_secs: 60
        "#);
    }

    #[test]
    fn test_embedding_request_snapshot() {
        let request = EmbeddingRequest {
            model: OpenAiClient::TEXT_EMBEDDING_ADA_002,
            input: "When is the project deadline",
        };

        assert_yaml_snapshot!(request, @r#"
        model: text-embedding-ada-002
        input: When is the project deadline
        "#);
    }

    #[test]
    fn test_completion_request_messages_snapshot() {
        let request = ChatRequest::deterministic(
            OpenAiClient::GPT_3_5_TURBO,
            vec![
                ChatMessage::system("You answer questions about the thesis"),
                ChatMessage::user("Question"),
            ],
        );
        let body = CompletionRequest {
            model: &request.model_id,
            messages: &request.messages,
            temperature: request.temperature,
        };

        assert_eq!(body.temperature, 0.0);
        assert_yaml_snapshot!(body.messages, @r#"
        - role: system
          content: You answer questions about the thesis
        - role: user
          content: Question
        "#);
    }

    #[test]
    fn test_model_constants() {
        assert_yaml_snapshot!(OpenAiClient::GPT_3_5_TURBO, @"gpt-3.5-turbo");
        assert_yaml_snapshot!(OpenAiClient::TEXT_EMBEDDING_ADA_002, @"text-embedding-ada-002");
    }
}
