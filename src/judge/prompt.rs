//! Judge prompts.
//!
//! Judges answer in Chinese, so the verdict synonym sets in
//! [`crate::parsing::parser`] are keyed on the words requested here.

pub fn text_prompt(text: &str) -> String {
    format!(
        r#"请对以下新闻内容进行事实核查。请严格按照以下 JSON 格式返回你的分析结果，不要添加任何额外的解释性文字或markdown标记：
{{ "verdict": "判断结果", "confidence": 置信度分数, "reason": "理由/证据摘要" }}
判断结果必须是"真实"、"虚假"、"无法核实"或"混合信息"之一。置信度分数是一个 0.0 到 1.0 之间的小数。理由请提供简洁客观的分析依据。
新闻内容："{text}""#
    )
}

pub fn text_image_prompt(text: &str) -> String {
    format!(
        r#"请分析提供的图片，并结合以下新闻文本进行判断。请严格按照以下 JSON 格式返回你的分析结果：
{{ "verdict": "综合判断结果", "confidence": 置信度分数, "reason": "图片与文本关联性分析及判断理由" }}
综合判断结果是对结合图片和文本后新闻整体真实性的判断（真实/虚假/无法核实/混合信息）。置信度分数是你对此判断的确信程度（0.0-1.0）。
新闻文本："{text}""#
    )
}

pub fn image_only_prompt() -> String {
    r#"请分析提供的图片，判断它所描绘的场景或事件的真实性。请严格按照以下 JSON 格式返回你的分析结果：
{ "verdict": "图片真实性判断", "confidence": 置信度分数, "reason": "图片分析理由（例如：是否像真实照片、AI生成、拼接、摆拍等）" }
图片真实性判断是"真实"、"疑似伪造"、"无法判断"之一。"#
        .to_string()
}
