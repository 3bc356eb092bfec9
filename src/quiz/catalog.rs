use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct QuizOption {
    pub value: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Serialize)]
pub struct QuizQuestion {
    pub id: u32,
    pub key: &'static str,
    pub question: &'static str,
    pub options: &'static [QuizOption],
}

impl QuizQuestion {
    pub fn accepts(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

const fn opt(value: &'static str, label: &'static str, icon: &'static str) -> QuizOption {
    QuizOption { value, label, icon }
}

pub static QUESTIONS: &[QuizQuestion] = &[
    QuizQuestion {
        id: 1,
        key: "main_goal",
        question: "Qual é seu principal objetivo?",
        options: &[
            opt("lose_weight", "Emagrecer", "📉"),
            opt("gain_muscle", "Ganhar massa muscular", "💪"),
            opt("tone_body", "Definir o corpo", "⚡"),
            opt("improve_health", "Melhorar saúde e energia", "❤️"),
        ],
    },
    QuizQuestion {
        id: 2,
        key: "activity_level",
        question: "Como é seu nível atual de atividade física?",
        options: &[
            opt("sedentary", "Sedentário", "🛋️"),
            opt("lightly_active", "Levemente ativo", "🚶"),
            opt("moderately_active", "Moderadamente ativo", "🏃"),
            opt("very_active", "Muito ativo", "🏋️"),
        ],
    },
    QuizQuestion {
        id: 3,
        key: "previous_attempts",
        question: "Você já tentou emagrecer antes?",
        options: &[
            opt("never", "Nunca", "🆕"),
            opt("few_times", "Algumas vezes", "🔄"),
            opt("many_times", "Muitas vezes", "🔁"),
        ],
    },
    QuizQuestion {
        id: 4,
        key: "main_difficulty",
        question: "Qual sua maior dificuldade hoje?",
        options: &[
            opt("lack_of_time", "Falta de tempo", "⏰"),
            opt("lack_of_consistency", "Falta de constância", "📊"),
            opt("disorganized_eating", "Alimentação desorganizada", "🍽️"),
            opt("motivation", "Motivação", "🎯"),
        ],
    },
    QuizQuestion {
        id: 5,
        key: "supplements_usage",
        question: "Você utiliza suplementos atualmente?",
        options: &[
            opt("yes", "Sim", "✅"),
            opt("no", "Não", "❌"),
            opt("planning_to", "Pretendo usar", "🤔"),
        ],
    },
    QuizQuestion {
        id: 6,
        key: "weekly_dedication",
        question: "Quantos dias por semana você consegue se dedicar?",
        options: &[
            opt("1_2_days", "1–2 dias", "📅"),
            opt("3_4_days", "3–4 dias", "📆"),
            opt("5_plus_days", "5 dias ou mais", "🗓️"),
        ],
    },
];
