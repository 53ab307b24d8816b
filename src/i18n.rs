use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromFormField)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[field(value = "en")]
    En,
    #[field(value = "bn")]
    Bn,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Bn => "bn",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::Bn => &BN,
        }
    }
}

/// Every user-facing string, in one language.
#[derive(Debug, Serialize)]
pub struct Strings {
    pub home: &'static str,
    pub written_blogs: &'static str,
    pub series_blogs: &'static str,
    pub all_blogs: &'static str,
    pub about: &'static str,
    pub contact: &'static str,
    pub change_lang: &'static str,
    pub welcome: &'static str,
    pub search_placeholder: &'static str,
    pub no_results: &'static str,
    pub click_to_read: &'static str,
    pub back: &'static str,
    pub see_all: &'static str,
    pub close: &'static str,
    pub publish: &'static str,
    pub cancel: &'static str,
    pub category: &'static str,
    pub all_categories: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub author: &'static str,
    pub by: &'static str,
    pub seo_title: &'static str,
    pub image_upload: &'static str,
    pub post_type: &'static str,
    pub featured: &'static str,
    pub postcard: &'static str,
    pub episode_name: &'static str,
    pub series_name: &'static str,
    pub series_badge: &'static str,
    pub episodes: &'static str,
    pub new_post: &'static str,
    pub delete: &'static str,
    pub delete_confirm: &'static str,
    pub post_deleted: &'static str,
    pub post_published: &'static str,
    pub incorrect_password: &'static str,
    pub new_password: &'static str,
    pub password_changed: &'static str,
    pub confirm: &'static str,
    pub password_prompt: &'static str,
    pub login: &'static str,
    pub lock: &'static str,
    pub fill_required: &'static str,
    pub series_name_required: &'static str,
    pub save_failed: &'static str,
    pub post_not_found: &'static str,
    pub series_not_found: &'static str,
    pub page_not_found: &'static str,
    pub font_settings: &'static str,
    pub font_size: &'static str,
    pub theme_light: &'static str,
    pub theme_dark: &'static str,
    pub make_default: &'static str,
    pub defaults_saved: &'static str,
    pub export: &'static str,
    pub import: &'static str,
    pub imported: &'static str,
    pub import_failed: &'static str,
    pub english: &'static str,
    pub bengali: &'static str,
    pub about_body: [&'static str; 2],
    pub follow_facebook: &'static str,
}

pub static EN: Strings = Strings {
    home: "Home",
    written_blogs: "My Written Blogs",
    series_blogs: "Series Blogs",
    all_blogs: "All Blogs",
    about: "About",
    contact: "Contact",
    change_lang: "Change Language",
    welcome: "Welcome to my blog website",
    search_placeholder: "Search for articles, series...",
    no_results: "No results found",
    click_to_read: "Click to read",
    back: "Back",
    see_all: "See all",
    close: "Close",
    publish: "Publish",
    cancel: "Cancel",
    category: "Category",
    all_categories: "All",
    title: "Title",
    content: "Content",
    author: "Author",
    by: "By",
    seo_title: "SEO Title",
    image_upload: "Upload Image",
    post_type: "Post Type",
    featured: "Featured Post",
    postcard: "Postcard",
    episode_name: "Episode Name",
    series_name: "Series Name",
    series_badge: "SERIES",
    episodes: "Episodes",
    new_post: "New Post",
    delete: "Delete",
    delete_confirm: "Delete this post?",
    post_deleted: "Post deleted",
    post_published: "Post published",
    incorrect_password: "Incorrect password",
    new_password: "New Password",
    password_changed: "Password changed successfully",
    confirm: "Confirm",
    password_prompt: "Enter Password",
    login: "Login",
    lock: "Lock",
    fill_required: "Please fill all required fields",
    series_name_required: "Please enter a series name",
    save_failed: "Could not save, please try again",
    post_not_found: "Post not found",
    series_not_found: "Series not found",
    page_not_found: "Page not found",
    font_settings: "Font Settings",
    font_size: "Font size",
    theme_light: "Light mode",
    theme_dark: "Dark mode",
    make_default: "Use my settings as the site default",
    defaults_saved: "Default settings saved",
    export: "Export",
    import: "Import",
    imported: "Posts imported",
    import_failed: "Import failed",
    english: "English",
    bengali: "Bengali",
    about_body: [
        "Welcome to my personal blog. This platform is dedicated to sharing thoughts, experiences, and specialized series of articles that bring depth and knowledge.",
        "I aim to provide a peaceful reading experience. Your comfort is my priority, which is why fonts and themes can be customized.",
    ],
    follow_facebook: "Follow me on Facebook",
};

pub static BN: Strings = Strings {
    home: "হোম",
    written_blogs: "আমার লিখিত ব্লগ",
    series_blogs: "সিরিজ ব্লগ",
    all_blogs: "সকল ব্লগ",
    about: "ওয়েবসাইট সম্পর্কে",
    contact: "যোগাযোগ",
    change_lang: "ভাষা পরিবর্তন করুন",
    welcome: "আমার ব্লগ ওয়েবসাইটে স্বাগতম",
    search_placeholder: "আর্টিকেল, সিরিজ বা লেখা খুঁজুন...",
    no_results: "কোনো ফলাফল পাওয়া যায়নি",
    click_to_read: "ক্লিক করে পড়ুন",
    back: "ফিরে যান",
    see_all: "সব দেখুন",
    close: "বন্ধ করুন",
    publish: "পাবলিশ",
    cancel: "বাতিল",
    category: "ক্যাটাগরি",
    all_categories: "সব",
    title: "শিরোনাম",
    content: "মূল লেখা",
    author: "লেখকের নাম",
    by: "লিখেছেন",
    seo_title: "সার্চ ইঞ্জিন টাইটেল",
    image_upload: "ছবি আপলোড",
    post_type: "পোস্টের ধরন",
    featured: "ফিচারড পোস্ট",
    postcard: "পোস্টকার্ড",
    episode_name: "এপিসোডের নাম",
    series_name: "সিরিজের নাম",
    series_badge: "সিরিজ",
    episodes: "পর্ব",
    new_post: "নতুন পোস্ট",
    delete: "মুছে ফেলুন",
    delete_confirm: "এই পোস্টটি মুছে ফেলবেন?",
    post_deleted: "পোস্ট মুছে ফেলা হয়েছে",
    post_published: "পোস্ট পাবলিশ হয়েছে",
    incorrect_password: "ভুল পাসওয়ার্ড",
    new_password: "নতুন পাসওয়ার্ড",
    password_changed: "পাসওয়ার্ড সফলভাবে পরিবর্তন হয়েছে",
    confirm: "নিশ্চিত করুন",
    password_prompt: "পাসওয়ার্ড দিন",
    login: "লগইন",
    lock: "লক করুন",
    fill_required: "অনুগ্রহ করে সব প্রয়োজনীয় তথ্য পূরণ করুন",
    series_name_required: "অনুগ্রহ করে সিরিজের নাম দিন",
    save_failed: "সংরক্ষণ করা যায়নি, আবার চেষ্টা করুন",
    post_not_found: "পোস্ট পাওয়া যায়নি",
    series_not_found: "সিরিজ পাওয়া যায়নি",
    page_not_found: "পেজ পাওয়া যায়নি",
    font_settings: "ফন্ট সেটিং",
    font_size: "ফন্টের আকার",
    theme_light: "লাইট মোড",
    theme_dark: "ডার্ক মোড",
    make_default: "আমার সেটিং সাইটের ডিফল্ট করুন",
    defaults_saved: "ডিফল্ট সেটিং সংরক্ষিত হয়েছে",
    export: "এক্সপোর্ট",
    import: "ইমপোর্ট",
    imported: "পোস্ট ইমপোর্ট হয়েছে",
    import_failed: "ইমপোর্ট ব্যর্থ হয়েছে",
    english: "ইংরেজি",
    bengali: "বাংলা",
    about_body: [
        "আমার ব্যক্তিগত ব্লগে স্বাগতম। এখানে আমি আমার ভাবনা, অভিজ্ঞতা এবং গভীর জ্ঞানের সিরিজ আর্টিকেল শেয়ার করি।",
        "শান্তিময় পড়ার অভিজ্ঞতা দেওয়াই আমার লক্ষ্য। তাই ফন্ট এবং থিম নিজের মতো করে বদলে নেওয়া যায়।",
    ],
    follow_facebook: "ফেসবুকে আমাকে অনুসরণ করুন",
};

const BN_MONTHS: [&str; 12] = [
    "জানুয়ারী",
    "ফেব্রুয়ারী",
    "মার্চ",
    "এপ্রিল",
    "মে",
    "জুন",
    "জুলাই",
    "আগস্ট",
    "সেপ্টেম্বর",
    "অক্টোবর",
    "নভেম্বর",
    "ডিসেম্বর",
];

/// Replace ASCII digits with Bengali digits.
pub fn bengali_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x09E6 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Long-form publish date: `January 5, 2025` or `৫ জানুয়ারী, ২০২৫`.
pub fn format_date(date: NaiveDate, lang: Language) -> String {
    match lang {
        Language::En => date.format("%B %-d, %Y").to_string(),
        Language::Bn => {
            let month = BN_MONTHS[date.month0() as usize];
            bengali_digits(&format!("{} {}, {}", date.day(), month, date.year()))
        }
    }
}
