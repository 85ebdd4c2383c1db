//! AI 经营助手 - Gemini 代理服务
//!
//! 将 AI 调用收敛到后端，避免 API 密钥下发到客户端。
//! 密钥缺失或调用失败时返回固定的中文兜底文案，接口永不报错。

use serde::{Deserialize, Serialize};

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

// ==================== Gemini 协议结构 ====================

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// AI 服务状态
///
/// `provider` 未配置时序列化为 null 而不是缺省该字段。
#[derive(Debug, Clone, Serialize)]
pub struct AiStatus {
    pub available: bool,
    pub provider: Option<&'static str>,
}

/// Gemini 代理服务
///
/// # 兜底策略
///
/// | 场景 | 行为 |
/// |------|------|
/// | 未配置密钥 | 返回固定文案 |
/// | HTTP 客户端构建失败 | 返回固定文案 |
/// | 响应为空 | 返回固定文案 |
/// | 网络/接口错误 | 返回固定文案 |
#[derive(Debug, Clone)]
pub struct AiService {
    api_key: Option<String>,
    client: Option<reqwest::Client>,
}

impl AiService {
    pub fn new(api_key: Option<String>) -> Self {
        let client = api_key.as_ref().and_then(|_| {
            reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .ok()
        });
        Self { api_key, client }
    }

    /// 服务可用性 (仅检查密钥是否配置，不发起真实调用)
    pub fn status(&self) -> AiStatus {
        let available = self.api_key.is_some();
        AiStatus {
            available,
            provider: available.then_some("Google Gemini"),
        }
    }

    /// 生成经营洞察
    ///
    /// `question` 为空时使用默认分析任务；`context` 为调用方附带的
    /// 销售数据摘要，原样拼入提示词。
    pub async fn generate_insight(
        &self,
        question: Option<&str>,
        context: Option<&serde_json::Value>,
    ) -> String {
        let Some(api_key) = &self.api_key else {
            return "AI服务未配置。请联系管理员设置API密钥。".to_string();
        };
        let Some(client) = &self.client else {
            return "AI服务暂不可用。".to_string();
        };

        let task = question.unwrap_or(
            "Provide a concise, bulleted list of 3 strategic insights \
             and 1 marketing recommendation to improve revenue.",
        );
        let data = context
            .map(|v| v.to_string())
            .unwrap_or_else(|| "{}".to_string());
        let prompt = format!(
            "Act as a senior business analyst for a retail store using a POS system.\n\
             Analyze the following sales data.\n\
             {task}\n\
             Keep the tone professional and encouraging.\n\
             Please respond in Chinese.\n\n\
             Data:\n{data}"
        );

        match self.generate(client, api_key, prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => "无法生成洞察，请稍后重试。".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "AI insight request failed");
                "生成洞察时出错，请稍后重试。".to_string()
            }
        }
    }

    /// 生成商品描述 (20 字以内的菜单文案)
    pub async fn generate_product_description(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> String {
        let Some(api_key) = &self.api_key else {
            return "美味可口，值得品尝。".to_string();
        };
        let Some(client) = &self.client else {
            return "精心制作，口感绝佳。".to_string();
        };

        let category_hint = category
            .map(|c| format!(" in the \"{c}\" category"))
            .unwrap_or_default();
        let prompt = format!(
            "Write a short, mouth-watering menu description (max 20 words) \
             for a dish named: \"{name}\"{category_hint}.\n\
             Please respond in Chinese."
        );

        match self.generate(client, api_key, prompt).await {
            Ok(Some(text)) => text,
            Ok(None) => "美味佳肴，不容错过。".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "AI description request failed");
                "精选食材，匠心制作。".to_string()
            }
        }
    }

    /// 调用 generateContent，返回第一个候选文本
    async fn generate(
        &self,
        client: &reqwest::Client,
        api_key: &str,
        prompt: String,
    ) -> Result<Option<String>, reqwest::Error> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = client
            .post(GEMINI_ENDPOINT)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateResponse>()
            .await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_returns_configured_fallbacks() {
        let ai = AiService::new(None);

        assert!(!ai.status().available);
        assert_eq!(ai.status().provider, None);
        assert_eq!(
            ai.generate_insight(None, None).await,
            "AI服务未配置。请联系管理员设置API密钥。"
        );
        assert_eq!(
            ai.generate_product_description("宫保鸡丁", None).await,
            "美味可口，值得品尝。"
        );
    }

    #[test]
    fn status_reports_provider_when_key_present() {
        let ai = AiService::new(Some("test-key".to_string()));
        let status = ai.status();
        assert!(status.available);
        assert_eq!(status.provider, Some("Google Gemini"));
    }
}
