use chrono::Utc;

use crate::models::post::PostRow;
use crate::utils::authoring::generate_slug;

/// Supplies rows for listings when the live store has nothing published.
///
/// Kept apart from [`super::ContentStore`] so the live path never mixes in
/// sample data, and so tests can swap the fallback in or out.
pub trait EmptyStateProvider: Send + Sync {
    fn posts(&self) -> Vec<PostRow>;

    fn post_by_slug(&self, slug: &str) -> Option<PostRow> {
        self.posts().into_iter().find(|p| p.slug == slug)
    }
}

/// No fallback: empty stores produce empty listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContent;

impl EmptyStateProvider for NoContent {
    fn posts(&self) -> Vec<PostRow> {
        Vec::new()
    }
}

/// The sample articles shown on a fresh site.
/// Ids are negative so they never collide with stored rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleContent;

struct Sample {
    title: &'static str,
    excerpt: &'static str,
    cover_image: &'static str,
    category: (&'static str, &'static str),
    author: (&'static str, Option<&'static str>),
    body: Option<&'static str>,
    read_time: i32,
}

const FEATURED_BODY: &str = r#"
<p>The web development landscape continues to evolve at a rapid pace. Several key trends are reshaping how we build and interact with web applications.</p>
<h2>AI-Powered Development Tools</h2>
<p>Tools powered by AI now help developers write code faster, debug issues more efficiently, and generate components from natural language descriptions.</p>
<h2>The Rise of Edge Computing</h2>
<p>By processing data closer to the user, edge computing gives faster load times and more responsive applications.</p>
<h2>WebAssembly Goes Mainstream</h2>
<p>WebAssembly enables high-performance applications that were previously impossible in the browser, from video editing to 3D gaming.</p>
<h2>Conclusion</h2>
<p>By staying informed about these trends and continuously learning, developers can position themselves at the forefront of innovation.</p>
"#;

const SAMPLES: &[Sample] = &[
    Sample {
        title: "The Future of Web Development: Trends to Watch",
        excerpt: "Explore the cutting-edge technologies and methodologies shaping the future of web development, from AI-powered tools to new frameworks.",
        cover_image: "https://images.unsplash.com/photo-1461749280684-dccba630e2f6?w=1200&q=80",
        category: ("Technology", "technology"),
        author: ("Alex Morgan", Some("Senior Web Developer and Tech Writer")),
        body: Some(FEATURED_BODY),
        read_time: 8,
    },
    Sample {
        title: "Mindful Living in a Digital Age",
        excerpt: "Discover practical strategies for maintaining balance and well-being in our increasingly connected world.",
        cover_image: "https://images.unsplash.com/photo-1506126613408-eca07ce68773?w=800&q=80",
        category: ("Lifestyle", "lifestyle"),
        author: ("Sarah Chen", None),
        body: None,
        read_time: 5,
    },
    Sample {
        title: "Hidden Gems: Unexplored Destinations",
        excerpt: "From remote islands to mountain villages, discover the world's most beautiful underrated travel destinations.",
        cover_image: "https://images.unsplash.com/photo-1476514525535-07fb3b4ae5f1?w=800&q=80",
        category: ("Travel", "travel"),
        author: ("Marco Rivera", None),
        body: None,
        read_time: 6,
    },
    Sample {
        title: "Building a Sustainable Business Model",
        excerpt: "Learn how forward-thinking companies are integrating sustainability into their core business strategies.",
        cover_image: "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=800&q=80",
        category: ("Business", "business"),
        author: ("Emma Wright", None),
        body: None,
        read_time: 7,
    },
    Sample {
        title: "The Art of Minimalist Design",
        excerpt: "How less becomes more in modern design.",
        cover_image: "https://images.unsplash.com/photo-1618005182384-a83a8bd57fbe?w=800&q=80",
        category: ("Design", "design"),
        author: ("Lisa Park", None),
        body: None,
        read_time: 4,
    },
    Sample {
        title: "Remote Work Best Practices",
        excerpt: "Tips for staying productive while working from anywhere.",
        cover_image: "https://images.unsplash.com/photo-1521898284481-a5ec348cb555?w=800&q=80",
        category: ("Business", "business"),
        author: ("Tom Baker", None),
        body: None,
        read_time: 6,
    },
];

impl EmptyStateProvider for SampleContent {
    fn posts(&self) -> Vec<PostRow> {
        let now = Utc::now();
        SAMPLES
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                let content = sample
                    .body
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("<p>{}</p>", sample.excerpt));
                let id = -(index as i64 + 1);

                PostRow {
                    id,
                    title: sample.title.to_string(),
                    slug: generate_slug(sample.title),
                    excerpt: Some(sample.excerpt.to_string()),
                    read_time: Some(sample.read_time),
                    content,
                    cover_image: Some(sample.cover_image.to_string()),
                    category_id: None,
                    author_id: 0,
                    published: true,
                    featured: index == 0,
                    created_at: now,
                    updated_at: now,
                    category_name: Some(sample.category.0.to_string()),
                    category_slug: Some(sample.category.1.to_string()),
                    author_name: Some(sample.author.0.to_string()),
                    author_bio: sample.author.1.map(str::to_string),
                }
            })
            .collect()
    }
}
