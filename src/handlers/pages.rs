// Server-rendered pages: landing, profile, edit form, admin dashboard
// Unknown paths redirect to the landing page

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::error;

use crate::{
    app::AppState,
    models::profile::{AdminStats, PetProfile},
    services::ProfileService,
    utils::validate_profile_id,
};

// =============================================================================
// HANDLERS
// =============================================================================

/// GET / - marketing landing page
pub async fn landing() -> Html<String> {
    Html(landing_page_html())
}

/// GET /pet/:id - public profile page.
/// Unprovisioned or incomplete profiles get the landing view; a backend
/// failure degrades the same way rather than showing an error screen.
pub async fn pet_profile_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Html<String> {
    if validate_profile_id(&id).is_err() {
        return Html(landing_page_html());
    }

    let service = ProfileService::new(&state);

    match service.fetch_by_id(&id).await {
        Ok(Some(profile)) if profile.is_complete => Html(profile_page_html(&profile)),
        Ok(_) => Html(landing_page_html()),
        Err(e) => {
            error!(profile_id = %id, "Profile page lookup failed: {}", e);
            Html(landing_page_html())
        },
    }
}

#[derive(Debug, Deserialize)]
pub struct EditPageQuery {
    pub id: Option<String>,
}

/// GET /edit?id=:id - PIN-gated create/edit form
pub async fn edit_page(Query(query): Query<EditPageQuery>) -> impl IntoResponse {
    match query.id.as_deref().map(str::trim) {
        Some(id) if validate_profile_id(id).is_ok() => {
            Html(edit_page_html(id)).into_response()
        },
        _ => Redirect::to("/").into_response(),
    }
}

/// GET /admin - dashboard with stats and the full profile list
pub async fn admin_page(State(state): State<AppState>) -> Html<String> {
    let service = ProfileService::new(&state);

    let stats = service.admin_stats().await;
    let profiles = match service.fetch_all().await {
        Ok(profiles) => profiles,
        Err(e) => {
            // Leave the listing empty; the stats cards still render
            error!("Admin listing failed: {}", e);
            Vec::new()
        },
    };

    Html(admin_page_html(&profiles, stats))
}

/// Catch-all: unknown paths go home
pub async fn fallback_redirect() -> Redirect {
    Redirect::to("/")
}

// =============================================================================
// TEMPLATES
// =============================================================================

/// Minimal HTML escaping for user-controlled text
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

const PAGE_STYLE: &str = r#"
        body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #f3f4f6; color: #1f2937; }
        .container { max-width: 760px; margin: 0 auto; padding: 2rem 1rem; }
        .card { background: white; border-radius: 16px; box-shadow: 0 4px 12px rgba(0,0,0,0.08); padding: 2rem; margin-bottom: 1.5rem; }
        .btn { display: inline-block; background: #2563eb; color: white; border: none; border-radius: 10px; padding: 0.75rem 1.5rem; font-size: 1rem; cursor: pointer; text-decoration: none; }
        .btn:hover { background: #1d4ed8; }
        .muted { color: #6b7280; }
        input, select, textarea { width: 100%; box-sizing: border-box; padding: 0.6rem; border: 1px solid #d1d5db; border-radius: 8px; margin: 0.25rem 0 0.9rem; font-size: 1rem; }
        label { font-size: 0.85rem; font-weight: 600; color: #374151; }
        .notice { background: #fee2e2; color: #991b1b; border-radius: 8px; padding: 0.6rem 1rem; margin-bottom: 1rem; display: none; }
        .toast { position: fixed; top: 1rem; left: 50%; transform: translateX(-50%); background: #111827; color: white; border-radius: 10px; padding: 0.75rem 1.25rem; display: none; }
"#;

fn landing_page_html() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>PawTag - A tag that brings them home</title>
    <style>{style}
        .hero {{ background: linear-gradient(135deg, #2563eb 0%, #7c3aed 100%); color: white; padding: 5rem 1rem; text-align: center; }}
        .hero h1 {{ font-size: 2.5rem; margin: 0 0 1rem; }}
        .hero p {{ max-width: 480px; margin: 0 auto 2rem; opacity: 0.9; line-height: 1.6; }}
        .hero .btn {{ background: white; color: #2563eb; font-weight: 600; }}
    </style>
</head>
<body>
    <div class="hero">
        <h1>🐾 PawTag</h1>
        <p>Every tag links to a living profile: photo, description and the
        owner's contact details, one scan away for whoever finds your pet.</p>
        <a class="btn" href="/admin">Open dashboard</a>
    </div>
    <div class="container">
        <div class="card">
            <h2>Scanned a blank tag?</h2>
            <p class="muted">This tag has not been set up yet. If it came with
            your PawTag kit, open the edit link from the package to create your
            pet's profile.</p>
        </div>
    </div>
</body>
</html>"#,
        style = PAGE_STYLE
    )
}

fn profile_page_html(profile: &PetProfile) -> String {
    let name = escape_html(&profile.name);
    let gender = escape_html(&profile.gender);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{name} - PawTag</title>
    <style>{style}
        .cover {{ height: 220px; background-image: url('{cover_url}'); background-size: cover; background-position: center; }}
        .avatar {{ width: 140px; height: 140px; border-radius: 50%; border: 5px solid white; object-fit: cover; margin-top: -70px; background: #e5e7eb; }}
        .actions {{ display: flex; gap: 0.75rem; margin-top: 1.5rem; flex-wrap: wrap; }}
        dt {{ font-weight: 600; color: #374151; margin-top: 0.75rem; }}
        dd {{ margin: 0.15rem 0 0; color: #4b5563; }}
    </style>
</head>
<body>
    <div class="cover"></div>
    <div class="container">
        <div class="card" style="text-align: center;">
            <img class="avatar" src="{image_url}" alt="{name}">
            <h1>{name}</h1>
            <p class="muted">{breed} &middot; {age} years &middot; {gender}</p>
            <p>{description}</p>
            <div class="actions" style="justify-content: center;">
                <button class="btn" onclick="shareProfile()">Share</button>
                <a class="btn" href="/edit?id={id}">Edit</a>
                <a class="btn" href="/api/v1/profiles/{id}/passport.pdf">Passport PDF</a>
            </div>
        </div>
        <div class="card">
            <h2>Owner contact</h2>
            <dl>
                <dt>Name</dt><dd>{owner_name}</dd>
                <dt>Phone</dt><dd><a href="tel:{owner_phone}">{owner_phone}</a></dd>
                <dt>Email</dt><dd><a href="mailto:{owner_email}">{owner_email}</a></dd>
                <dt>Address</dt><dd>{address}</dd>
            </dl>
        </div>
    </div>
    <div class="toast" id="toast">Link copied to clipboard</div>
    <script>
        function shareProfile() {{
            navigator.clipboard.writeText(window.location.href).then(() => {{
                const toast = document.getElementById('toast');
                toast.style.display = 'block';
                setTimeout(() => {{ toast.style.display = 'none'; }}, 2000);
            }});
        }}
    </script>
</body>
</html>"#,
        style = PAGE_STYLE,
        id = escape_html(&profile.id),
        name = name,
        breed = escape_html(&profile.breed),
        age = profile.age,
        gender = gender,
        description = escape_html(&profile.description),
        image_url = escape_html(&profile.image_url),
        cover_url = escape_html(&profile.cover_image_url),
        owner_name = escape_html(&profile.owner_name),
        owner_phone = escape_html(&profile.owner_phone),
        owner_email = escape_html(&profile.owner_email),
        address = escape_html(&profile.address),
    )
}

fn edit_page_html(id: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Edit profile - PawTag</title>
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <div class="card" id="pin-card" style="display: none;">
            <h2>Enter PIN to edit</h2>
            <div class="notice" id="pin-notice">Incorrect PIN</div>
            <input type="password" id="pin-input" placeholder="Enter PIN">
            <button class="btn" onclick="submitPin()">Confirm</button>
        </div>

        <form class="card" id="edit-card" style="display: none;" onsubmit="saveProfile(event)">
            <h2 id="edit-title">Create profile</h2>
            <div class="notice" id="save-notice">Saving failed, please try again</div>

            <label>Photo</label>
            <input type="file" id="image-input" accept="image/*">
            <img id="image-preview" style="max-width: 160px; border-radius: 12px; display: none;">

            <label>Pet name</label>
            <input type="text" id="f-name">
            <label>Breed</label>
            <input type="text" id="f-breed">
            <label>Age</label>
            <input type="number" id="f-age" min="0">
            <label>Gender</label>
            <select id="f-gender">
                <option value="male">Male</option>
                <option value="female">Female</option>
            </select>
            <label>Address</label>
            <input type="text" id="f-address">
            <label>Description</label>
            <textarea id="f-description" rows="4"></textarea>

            <h3>Owner information</h3>
            <label>Owner name</label>
            <input type="text" id="f-owner-name">
            <label>Phone number</label>
            <input type="tel" id="f-owner-phone">
            <label>Email</label>
            <input type="email" id="f-owner-email">

            <h3>Security</h3>
            <label>PIN (for future edits)</label>
            <input type="password" id="f-pin">

            <button class="btn" type="submit">🐾 Save profile</button>
        </form>
    </div>
    <div class="toast" id="toast">Profile saved!</div>
    <script>
        const profileId = "{id}";
        let unlockedPin = "";
        let imageData = null;

        async function init() {{
            const res = await fetch(`/api/v1/profiles/${{profileId}}`);
            const body = await res.json();
            if (body.exists && body.profile.has_pin) {{
                document.getElementById('pin-card').style.display = 'block';
            }} else {{
                unlock(body.exists ? body.profile : null);
            }}
        }}

        async function submitPin() {{
            const pin = document.getElementById('pin-input').value;
            const res = await fetch(`/api/v1/profiles/${{profileId}}/verify-pin`, {{
                method: 'POST',
                headers: {{ 'Content-Type': 'application/json' }},
                body: JSON.stringify({{ pin }}),
            }});
            const body = await res.json();
            if (body.valid) {{
                unlockedPin = pin;
                const profileRes = await fetch(`/api/v1/profiles/${{profileId}}`);
                const lookup = await profileRes.json();
                document.getElementById('pin-card').style.display = 'none';
                unlock(lookup.profile);
            }} else {{
                document.getElementById('pin-notice').style.display = 'block';
            }}
        }}

        function unlock(profile) {{
            if (profile) {{
                document.getElementById('edit-title').textContent = 'Edit profile';
                document.getElementById('f-name').value = profile.name;
                document.getElementById('f-breed').value = profile.breed;
                document.getElementById('f-age').value = profile.age;
                document.getElementById('f-gender').value = profile.gender;
                document.getElementById('f-address').value = profile.address;
                document.getElementById('f-description').value = profile.description;
                document.getElementById('f-owner-name').value = profile.owner_name;
                document.getElementById('f-owner-phone').value = profile.owner_phone;
                document.getElementById('f-owner-email').value = profile.owner_email;
                const preview = document.getElementById('image-preview');
                preview.src = profile.image_url;
                preview.style.display = 'block';
            }}
            document.getElementById('edit-card').style.display = 'block';
        }}

        document.getElementById('image-input').addEventListener('change', (event) => {{
            const file = event.target.files[0];
            if (!file) return;
            const reader = new FileReader();
            reader.onloadend = () => {{
                imageData = reader.result;
                const preview = document.getElementById('image-preview');
                preview.src = imageData;
                preview.style.display = 'block';
            }};
            reader.readAsDataURL(file);
        }});

        async function saveProfile(event) {{
            event.preventDefault();
            const draft = {{
                name: document.getElementById('f-name').value,
                breed: document.getElementById('f-breed').value,
                age: parseInt(document.getElementById('f-age').value, 10) || 0,
                gender: document.getElementById('f-gender').value,
                address: document.getElementById('f-address').value,
                description: document.getElementById('f-description').value,
                owner_name: document.getElementById('f-owner-name').value,
                owner_phone: document.getElementById('f-owner-phone').value,
                owner_email: document.getElementById('f-owner-email').value,
                current_pin: unlockedPin,
            }};
            const pin = document.getElementById('f-pin').value;
            if (pin) draft.pin = pin;

            if (imageData) {{
                const uploadRes = await fetch('/api/v1/images', {{
                    method: 'POST',
                    headers: {{ 'Content-Type': 'application/json' }},
                    body: JSON.stringify({{ data: imageData }}),
                }});
                if (uploadRes.ok) {{
                    const uploaded = await uploadRes.json();
                    draft.image_url = uploaded.url;
                }}
            }}

            const res = await fetch(`/api/v1/profiles/${{profileId}}`, {{
                method: 'PUT',
                headers: {{ 'Content-Type': 'application/json' }},
                body: JSON.stringify(draft),
            }});
            if (res.ok) {{
                const toast = document.getElementById('toast');
                toast.style.display = 'block';
                setTimeout(() => {{
                    window.location.href = `/pet/${{profileId}}`;
                }}, 2000);
            }} else {{
                document.getElementById('save-notice').style.display = 'block';
            }}
        }}

        init();
    </script>
</body>
</html>"#,
        style = PAGE_STYLE,
        id = escape_html(id),
    )
}

fn admin_page_html(profiles: &[PetProfile], stats: AdminStats) -> String {
    let rows: String = profiles
        .iter()
        .map(|p| {
            format!(
                r#"<tr>
                    <td><a href="/pet/{id}">{id}</a></td>
                    <td>{name}</td>
                    <td>{owner}</td>
                    <td>{created}</td>
                    <td>{updated}</td>
                </tr>"#,
                id = escape_html(&p.id),
                name = escape_html(&p.name),
                owner = escape_html(&p.owner_name),
                created = p.created_at.format("%Y-%m-%d"),
                updated = p.last_updated.format("%Y-%m-%d"),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Admin - PawTag</title>
    <style>{style}
        .stats {{ display: flex; gap: 1rem; flex-wrap: wrap; }}
        .stat {{ flex: 1; min-width: 160px; background: white; border-radius: 12px; padding: 1.25rem; box-shadow: 0 2px 8px rgba(0,0,0,0.06); }}
        .stat .value {{ font-size: 2rem; font-weight: 700; color: #2563eb; }}
        table {{ width: 100%; border-collapse: collapse; }}
        th, td {{ text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid #e5e7eb; font-size: 0.9rem; }}
    </style>
</head>
<body>
    <div class="container" style="max-width: 960px;">
        <h1>🐾 Admin dashboard</h1>
        <div class="stats">
            <div class="stat"><div class="value">{total}</div>Total profiles</div>
            <div class="stat"><div class="value">{monthly}</div>Created last 30 days</div>
            <div class="stat"><div class="value">{active}</div>Active last 30 days</div>
        </div>
        <div class="card" style="margin-top: 1.5rem;">
            <h2>Provision a tag</h2>
            <div class="notice" id="create-notice"></div>
            <input type="text" id="new-id" placeholder="Profile id, e.g. 042">
            <button class="btn" onclick="createProfile()">Create</button>
            <button class="btn" id="copy-url" style="display: none;" onclick="copyUrl()">Copy URL</button>
            <p class="muted" id="created-url"></p>
        </div>
        <div class="card">
            <h2>Profiles</h2>
            <table>
                <thead><tr><th>Id</th><th>Pet</th><th>Owner</th><th>Created</th><th>Updated</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>
        </div>
    </div>
    <script>
        let createdUrl = "";

        async function createProfile() {{
            const id = document.getElementById('new-id').value.trim();
            if (!id) return;
            const res = await fetch('/api/v1/admin/profiles', {{
                method: 'POST',
                headers: {{ 'Content-Type': 'application/json' }},
                body: JSON.stringify({{ id }}),
            }});
            const notice = document.getElementById('create-notice');
            if (res.ok) {{
                const body = await res.json();
                createdUrl = body.url;
                notice.style.display = 'none';
                document.getElementById('created-url').textContent =
                    `Tag URL: ${{body.url}} (write this to the tag)`;
                document.getElementById('copy-url').style.display = 'inline-block';
            }} else {{
                const body = await res.json();
                notice.textContent = body.message || 'Creation failed';
                notice.style.display = 'block';
            }}
        }}

        function copyUrl() {{
            if (createdUrl) navigator.clipboard.writeText(createdUrl);
        }}
    </script>
</body>
</html>"#,
        style = PAGE_STYLE,
        total = stats.total_profiles,
        monthly = stats.profiles_this_month,
        active = stats.active_profiles,
        rows = rows,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{DEFAULT_COVER_IMAGE_URL, DEFAULT_IMAGE_URL};
    use chrono::Utc;

    fn sample_profile() -> PetProfile {
        let now = Utc::now();
        PetProfile {
            id: "042".to_string(),
            name: "Luna <script>".to_string(),
            breed: "Labrador".to_string(),
            age: 3,
            gender: "female".to_string(),
            address: "ul. Warszawska 15".to_string(),
            description: "Friendly".to_string(),
            image_url: DEFAULT_IMAGE_URL.to_string(),
            cover_image_url: DEFAULT_COVER_IMAGE_URL.to_string(),
            owner_name: "Marta".to_string(),
            owner_phone: "+48 123".to_string(),
            owner_email: "marta@example.com".to_string(),
            pin: None,
            is_complete: true,
            created_at: now,
            last_updated: now,
        }
    }

    #[test]
    fn profile_page_escapes_user_content() {
        let html = profile_page_html(&sample_profile());
        assert!(html.contains("Luna &lt;script&gt;"));
        assert!(!html.contains("Luna <script>"));
    }

    #[test]
    fn landing_page_mentions_unprovisioned_tags() {
        let html = landing_page_html();
        assert!(html.contains("Scanned a blank tag?"));
    }

    #[test]
    fn admin_page_renders_stats_and_rows() {
        let stats = AdminStats {
            total_profiles: 5,
            profiles_this_month: 2,
            active_profiles: 3,
        };
        let html = admin_page_html(&[sample_profile()], stats);
        assert!(html.contains(">5</div>"));
        assert!(html.contains("/pet/042"));
    }
}
