#![forbid(unsafe_code)]

//! Named keyframe presets.
//!
//! Each preset is a fixed (keyframes, default duration, iterations) entry; none
//! carries state beyond what [`Animator::animate`](super::Animator::animate)
//! already does.

use std::time::Duration;

use super::Keyframe;

const MS_300: Duration = Duration::from_millis(300);
const MS_500: Duration = Duration::from_millis(500);
const SEC_1: Duration = Duration::from_secs(1);

/// Built-in transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    FadeIn,
    FadeOut,
    FocusIn,
    BlurOut,
    FadeInUp,
    FadeInLeft,
    FadeInRight,
    FadeOutDown,
    FadeOutLeft,
    FadeOutRight,
    Grow,
    Shrink,
    Rotate,
    Bounce,
    Flip,
    Shake,
}

impl Preset {
    /// Every preset, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::FadeIn,
        Self::FadeOut,
        Self::FocusIn,
        Self::BlurOut,
        Self::FadeInUp,
        Self::FadeInLeft,
        Self::FadeInRight,
        Self::FadeOutDown,
        Self::FadeOutLeft,
        Self::FadeOutRight,
        Self::Grow,
        Self::Shrink,
        Self::Rotate,
        Self::Bounce,
        Self::Flip,
        Self::Shake,
    ];

    /// Stable kebab-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FadeIn => "fade-in",
            Self::FadeOut => "fade-out",
            Self::FocusIn => "focus-in",
            Self::BlurOut => "blur-out",
            Self::FadeInUp => "fade-in-up",
            Self::FadeInLeft => "fade-in-left",
            Self::FadeInRight => "fade-in-right",
            Self::FadeOutDown => "fade-out-down",
            Self::FadeOutLeft => "fade-out-left",
            Self::FadeOutRight => "fade-out-right",
            Self::Grow => "grow",
            Self::Shrink => "shrink",
            Self::Rotate => "rotate",
            Self::Bounce => "bounce",
            Self::Flip => "flip",
            Self::Shake => "shake",
        }
    }

    /// Look a preset up by [`name`](Preset::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Duration used when the caller does not supply one.
    #[must_use]
    pub const fn default_duration(self) -> Duration {
        match self {
            Self::FadeIn | Self::FadeOut | Self::FocusIn | Self::BlurOut => MS_300,
            Self::Bounce | Self::Flip => MS_500,
            _ => SEC_1,
        }
    }

    /// Iteration count; every preset plays once.
    #[must_use]
    pub const fn iterations(self) -> u32 {
        1
    }

    /// Whether the preset ends with the node fully transparent.
    #[must_use]
    pub fn ends_hidden(self) -> bool {
        self.keyframes()
            .last()
            .and_then(|k| k.get("opacity"))
            .is_some_and(|o| o == "0")
    }

    /// Keyframe sequence.
    #[must_use]
    pub fn keyframes(self) -> Vec<Keyframe> {
        match self {
            Self::FadeIn => vec![Keyframe::new().opacity(1.0)],
            Self::FadeOut => vec![Keyframe::new().opacity(0.0)],
            Self::FocusIn => vec![Keyframe::new().filter("blur(0)").opacity(1.0)],
            Self::BlurOut => vec![Keyframe::new().filter("blur(.3rem)").opacity(0.0)],
            Self::FadeInUp => slide_in("translateY(40px)", "translateY(0)"),
            Self::FadeInLeft => slide_in("translateX(-40px)", "translateX(0)"),
            Self::FadeInRight => slide_in("translateX(40px)", "translateX(0)"),
            Self::FadeOutDown => slide_out("translateY(0)", "translateY(40px)"),
            Self::FadeOutLeft => slide_out("translateX(0)", "translateX(-40px)"),
            Self::FadeOutRight => slide_out("translateX(0)", "translateX(40px)"),
            Self::Grow => transforms(&["scale(0)", "scale(1)"]),
            Self::Shrink => transforms(&["scale(1)", "scale(0)"]),
            Self::Rotate => transforms(&["rotate(0deg)", "rotate(360deg)"]),
            Self::Bounce => transforms(&[
                "translateY(0)",
                "translateY(-30px)",
                "translateY(0)",
                "translateY(-15px)",
                "translateY(0)",
                "translateY(-30px)",
                "translateY(0)",
                "translateY(-15px)",
                "translateY(0)",
                "translateY(0)",
            ]),
            Self::Flip => flip(),
            Self::Shake => {
                let mut steps = vec!["translateX(0)"];
                for _ in 0..4 {
                    steps.push("translateX(-10px)");
                    steps.push("translateX(10px)");
                }
                steps.push("translateX(-10px)");
                steps.push("translateX(0)");
                transforms(&steps)
            }
        }
    }
}

fn slide_in(from: &str, to: &str) -> Vec<Keyframe> {
    vec![
        Keyframe::new().opacity(0.0).transform(from),
        Keyframe::new().opacity(1.0).transform(to),
    ]
}

fn slide_out(from: &str, to: &str) -> Vec<Keyframe> {
    vec![
        Keyframe::new().opacity(1.0).transform(from),
        Keyframe::new().opacity(0.0).transform(to),
    ]
}

fn transforms(steps: &[&str]) -> Vec<Keyframe> {
    steps.iter().map(|t| Keyframe::new().transform(t)).collect()
}

fn flip() -> Vec<Keyframe> {
    let out = |t: &str| {
        Keyframe::new()
            .transform(t)
            .with("animation-timing-function", "ease-out")
    };
    let inn = |t: &str| {
        Keyframe::new()
            .transform(t)
            .with("animation-timing-function", "ease-in")
    };
    vec![
        out("perspective(400px) rotateY(0)"),
        out("perspective(400px) rotateY(0)"),
        out("perspective(400px) rotateY(0)"),
        out("perspective(400px) translateZ(150px) rotateY(170deg)"),
        inn("perspective(400px) translateZ(150px) rotateY(190deg) scale(1)"),
        inn("perspective(400px) translateZ(150px) rotateY(190deg) scale(1)"),
        inn("perspective(400px) translateZ(150px) rotateY(190deg) scale(1)"),
        inn("perspective(400px) rotateY(360deg) scale(.95)"),
        inn("perspective(400px) rotateY(360deg) scale(.95)"),
        inn("perspective(400px) scale(1)"),
    ]
}
