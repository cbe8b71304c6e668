use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_IRRIGATION: &str = "main_menu.irrigation";
    pub const MAIN_MENU_GREENHOUSE: &str = "main_menu.greenhouse";
    pub const MAIN_MENU_RESIDENTIAL: &str = "main_menu.residential";
    pub const MAIN_MENU_HEATING: &str = "main_menu.heating";
    pub const MAIN_MENU_SOLAR: &str = "main_menu.solar";
    pub const MAIN_MENU_CATALOG: &str = "main_menu.catalog";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const SCENARIO_HEADING: &str = "scenario.heading";
    pub const SCENARIO_INPUT_HINT: &str = "scenario.input_hint";
    pub const PROMPT_DEFAULT: &str = "prompt.default";
    pub const PROMPT_REQUIRED: &str = "prompt.required";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_FLOW: &str = "result.flow";
    pub const RESULT_STATIC_HEAD: &str = "result.static_head";
    pub const RESULT_FRICTION: &str = "result.friction";
    pub const RESULT_TOTAL_HEAD: &str = "result.total_head";
    pub const RESULT_PRESSURE: &str = "result.pressure";
    pub const RESULT_DESIGN: &str = "result.design";
    pub const RESULT_STANDARDS: &str = "result.standards";
    pub const RESULT_PUMP: &str = "result.pump";
    pub const RESULT_NO_PUMP: &str = "result.no_pump";
    pub const RESULT_SUGGESTION: &str = "result.suggestion";
    pub const RESULT_CLOSEST: &str = "result.closest";

    pub const CATALOG_HEADING: &str = "catalog.heading";
    pub const CATALOG_EMPTY: &str = "catalog.empty";
    pub const CATALOG_TOTAL: &str = "catalog.total";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    Ko,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else {
            Language::Ko
        }
    }
}

/// 대화형 메뉴 문자열 번역기.
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    lang: Language,
}

impl Translator {
    /// 언어 코드(ko/en)에 따라 번역기를 생성한다. 알 수 없는 코드는 ko로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
        }
    }

    /// 번역을 가져온다. 영어 번역이 없으면 한국어 문자열을 폴백한다.
    pub fn t(&self, key: &str) -> &'static str {
        match self.lang {
            Language::En => en(key).unwrap_or_else(|| ko(key)),
            Language::Ko => ko(key),
        }
    }
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: Option<&str>, config_lang: Option<&str>) -> String {
    cli_arg
        .and_then(normalize_lang)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "ko".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    match code.trim().to_lowercase().as_str() {
        "auto" | "" => None,
        other => normalize_locale_string(other),
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko".into()),
        "en" => Some("en".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().and_then(|loc| normalize_locale_string(&loc)) {
        return Some(lang);
    }
    ["LC_ALL", "LANG"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

fn ko(key: &str) -> &'static str {
    use keys::*;
    match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== 펌프 선정 도구 ===",
        MAIN_MENU_IRRIGATION => "1) 농업 관개",
        MAIN_MENU_GREENHOUSE => "2) 온실 관수",
        MAIN_MENU_RESIDENTIAL => "3) 주거용 급수",
        MAIN_MENU_HEATING => "4) 난방 순환",
        MAIN_MENU_SOLAR => "5) 태양광 양수",
        MAIN_MENU_CATALOG => "6) 펌프 카탈로그",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        SCENARIO_HEADING => "\n-- 시나리오 입력 --",
        SCENARIO_INPUT_HINT => "엔터를 누르면 기본값을 사용합니다.",
        PROMPT_DEFAULT => "기본값",
        PROMPT_REQUIRED => "필수",
        RESULT_HEADING => "\n-- 계산 결과 --",
        RESULT_FLOW => "요구 유량:",
        RESULT_STATIC_HEAD => "정수두:",
        RESULT_FRICTION => "마찰 손실:",
        RESULT_TOTAL_HEAD => "전양정:",
        RESULT_PRESSURE => "압력:",
        RESULT_DESIGN => "설계값(안전율 적용):",
        RESULT_STANDARDS => "적용 기준:",
        RESULT_PUMP => "추천 펌프:",
        RESULT_NO_PUMP => "조건에 맞는 펌프가 없습니다.",
        RESULT_SUGGESTION => "제안:",
        RESULT_CLOSEST => "가장 가까운 펌프:",
        CATALOG_HEADING => "\n-- 펌프 카탈로그 --",
        CATALOG_EMPTY => "등록된 펌프가 없습니다.",
        CATALOG_TOTAL => "전체 펌프 수:",
        _ => "",
    }
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting.",
        MAIN_MENU_TITLE => "\n=== Pump Sizing Toolbox ===",
        MAIN_MENU_IRRIGATION => "1) Irrigation",
        MAIN_MENU_GREENHOUSE => "2) Greenhouse",
        MAIN_MENU_RESIDENTIAL => "3) Residential building",
        MAIN_MENU_HEATING => "4) Heating circulation",
        MAIN_MENU_SOLAR => "5) Solar pumping",
        MAIN_MENU_CATALOG => "6) Pump catalog",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please choose again.",
        SCENARIO_HEADING => "\n-- Scenario input --",
        SCENARIO_INPUT_HINT => "Press enter to accept the default.",
        PROMPT_DEFAULT => "default",
        PROMPT_REQUIRED => "required",
        RESULT_HEADING => "\n-- Result --",
        RESULT_FLOW => "Required flow:",
        RESULT_STATIC_HEAD => "Static head:",
        RESULT_FRICTION => "Friction loss:",
        RESULT_TOTAL_HEAD => "Total head:",
        RESULT_PRESSURE => "Pressure:",
        RESULT_DESIGN => "Design values (with safety factors):",
        RESULT_STANDARDS => "Standards applied:",
        RESULT_PUMP => "Recommended pump:",
        RESULT_NO_PUMP => "No pump matches the requirements.",
        RESULT_SUGGESTION => "Suggestion:",
        RESULT_CLOSEST => "Closest pump:",
        CATALOG_HEADING => "\n-- Pump catalog --",
        CATALOG_EMPTY => "The catalog is empty.",
        CATALOG_TOTAL => "Total pumps:",
        _ => return None,
    })
}
